use crate::error::{NntcError, Result};
use polars::prelude::*;
use super::types::RequiredColumn;
use std::collections::HashMap;

pub struct DataValidator;

impl DataValidator {
    /// Validate that DataFrame has required OHLCV columns
    pub fn validate_ohlcv(df: &DataFrame) -> Result<HashMap<RequiredColumn, String>> {
        let mut column_map = HashMap::new();

        for required in RequiredColumn::all() {
            match Self::find_column(df, &required) {
                Some(col_name) => {
                    column_map.insert(required, col_name.to_string());
                }
                None => {
                    return Err(NntcError::DataLoading(format!(
                        "Missing required column: {} (tried aliases: {:?})",
                        required.as_str(),
                        required.aliases()
                    )));
                }
            }
        }

        for (req_col, actual_name) in &column_map {
            Self::ensure_numeric(df, actual_name, req_col.as_str())?;
        }

        Self::validate_ohlc_relationships(df, &column_map)?;

        Ok(column_map)
    }

    /// Validate that every named column is present and numeric
    pub fn validate_columns(df: &DataFrame, columns: &[&str]) -> Result<()> {
        let names = df.get_column_names();
        let missing: Vec<&str> = columns
            .iter()
            .copied()
            .filter(|c| !names.iter().any(|n| n.as_str() == *c))
            .collect();
        if !missing.is_empty() {
            return Err(NntcError::DataLoading(format!(
                "Missing label-support columns: {:?}",
                missing
            )));
        }

        for column in columns {
            Self::ensure_numeric(df, column, column)?;
        }
        Ok(())
    }

    fn ensure_numeric(df: &DataFrame, actual_name: &str, role: &str) -> Result<()> {
        let series = df.column(actual_name)?;
        if !series.dtype().is_primitive_numeric() {
            return Err(NntcError::DataLoading(format!(
                "Column '{}' ({}) must be numeric, found {:?}",
                actual_name,
                role,
                series.dtype()
            )));
        }
        Ok(())
    }

    /// Find column by checking aliases
    fn find_column<'a>(df: &'a DataFrame, required: &RequiredColumn) -> Option<&'a str> {
        let columns = df.get_column_names();
        for alias in required.aliases() {
            if columns.iter().any(|col| col.as_str() == alias) {
                return Some(alias);
            }
        }
        None
    }

    /// Validate OHLC relationships (high >= low, high >= open, high >= close, etc.)
    fn validate_ohlc_relationships(
        df: &DataFrame,
        column_map: &HashMap<RequiredColumn, String>,
    ) -> Result<()> {
        let lookup = |column: RequiredColumn| -> Result<Column> {
            let name = column_map.get(&column).ok_or_else(|| {
                NntcError::DataLoading(format!("Column {} not mapped", column.as_str()))
            })?;
            Ok(df.column(name)?.cast(&DataType::Float64)?)
        };

        let high = lookup(RequiredColumn::High)?;
        let low = lookup(RequiredColumn::Low)?;
        let open = lookup(RequiredColumn::Open)?;
        let close = lookup(RequiredColumn::Close)?;

        let high = high.f64()?;
        let low = low.f64()?;
        let open = open.f64()?;
        let close = close.f64()?;

        for i in 0..df.height() {
            if let (Some(h), Some(l), Some(o), Some(c)) = (
                high.get(i),
                low.get(i),
                open.get(i),
                close.get(i),
            ) {
                if h < l {
                    return Err(NntcError::DataLoading(format!(
                        "Invalid data at row {}: high ({}) < low ({})",
                        i, h, l
                    )));
                }
                if h < o || h < c {
                    return Err(NntcError::DataLoading(format!(
                        "Invalid data at row {}: high ({}) < open ({}) or close ({})",
                        i, h, o, c
                    )));
                }
                if l > o || l > c {
                    return Err(NntcError::DataLoading(format!(
                        "Invalid data at row {}: low ({}) > open ({}) or close ({})",
                        i, l, o, c
                    )));
                }
            }
        }

        Ok(())
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(NntcError::DataLoading(format!(
                "Insufficient data: {} rows, minimum {} required",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Null counts per column, for columns that have any
    pub fn check_nulls(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        let mut null_report = Vec::new();

        for col_name in df.get_column_names() {
            let series = df.column(col_name)?;
            let null_count = series.null_count();
            if null_count > 0 {
                null_report.push((col_name.to_string(), null_count));
            }
        }

        Ok(null_report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_validate_good_data() {
        let df = df! {
            "open" => &[100.0, 101.0, 102.0],
            "high" => &[101.0, 103.0, 104.0],
            "low" => &[99.0, 100.0, 101.0],
            "close" => &[100.5, 102.0, 103.0],
            "volume" => &[1000.0, 1500.0, 1200.0],
        }
        .unwrap();

        let result = DataValidator::validate_ohlcv(&df);
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_invalid_ohlc() {
        let df = df! {
            "open" => &[100.0, 101.0],
            "high" => &[99.0, 103.0], // High < Open at row 0
            "low" => &[99.0, 100.0],
            "close" => &[100.5, 102.0],
            "volume" => &[1000.0, 1500.0],
        }
        .unwrap();

        let result = DataValidator::validate_ohlcv(&df);
        assert!(result.is_err());
    }

    #[test]
    fn test_column_aliases() {
        let df = df! {
            "Open" => &[100.0, 101.0],
            "HIGH" => &[101.0, 103.0],
            "low" => &[99.0, 100.0],
            "Close" => &[100.5, 102.0],
            "Vol" => &[1000.0, 1500.0],
        }
        .unwrap();

        let result = DataValidator::validate_ohlcv(&df);
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_label_columns() {
        let df = df! {
            "dwt_diff" => &[1.0, -1.0],
            "loss_threshold" => &[-0.5, -0.5],
            "note" => &["a", "b"],
        }
        .unwrap();

        assert!(DataValidator::validate_columns(&df, &["dwt_diff", "loss_threshold"]).is_ok());
        assert!(DataValidator::validate_columns(&df, &["dwt_diff", "future_gain"]).is_err());
        assert!(DataValidator::validate_columns(&df, &["note"]).is_err());
    }

    #[test]
    fn test_check_nulls() {
        let df = df! {
            "future_gain" => &[Some(1.0), None, Some(0.5)],
            "fisher_wr" => &[0.1, 0.2, 0.3],
        }
        .unwrap();

        let report = DataValidator::check_nulls(&df).unwrap();
        assert_eq!(report, vec![("future_gain".to_string(), 1)]);
    }
}
