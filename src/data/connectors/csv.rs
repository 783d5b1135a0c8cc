use crate::error::{NntcError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use super::{types::RequiredColumn, validator::DataValidator};

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| NntcError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load an enriched bar table and check it can feed a label rule.
    ///
    /// OHLCV columns are optional, but when any of them is present the full
    /// set is validated and renamed to the lowercase standard names.
    pub fn load_bar_table<P: AsRef<Path>>(
        path: P,
        required: &[&str],
        min_rows: Option<usize>,
    ) -> Result<DataFrame> {
        let mut df = Self::load(&path)?;
        log::info!(
            "Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            path.as_ref().display()
        );

        if Self::has_any_ohlcv(&df) {
            df = Self::normalize_columns(df)?;
        } else {
            log::debug!("No OHLCV columns found, skipping price validation");
        }

        DataValidator::validate_columns(&df, required)?;
        DataValidator::validate_minimum_rows(&df, min_rows.unwrap_or(1))?;

        // Warn about nulls but don't fail
        let null_report = DataValidator::check_nulls(&df)?;
        if !null_report.is_empty() {
            log::warn!("Null values detected: {:?}", null_report);
        }

        Ok(df)
    }

    /// Write a DataFrame as CSV with a header row
    pub fn write<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> Result<()> {
        let mut file = File::create(path.as_ref())?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .map_err(|e| NntcError::DataLoading(format!("Failed to write CSV: {}", e)))?;
        log::info!("Wrote {} rows to {}", df.height(), path.as_ref().display());
        Ok(())
    }

    /// Normalize column names to lowercase standard names
    pub fn normalize_columns(mut df: DataFrame) -> Result<DataFrame> {
        let column_map = DataValidator::validate_ohlcv(&df)?;

        for (required, actual_name) in column_map {
            let standard_name = required.as_str();
            if actual_name != standard_name {
                df.rename(&actual_name, standard_name.into())
                    .map_err(|e| NntcError::DataLoading(format!("Failed to rename column: {}", e)))?;
            }
        }

        Ok(df)
    }

    fn has_any_ohlcv(df: &DataFrame) -> bool {
        let columns = df.get_column_names();
        RequiredColumn::all().iter().any(|required| {
            required
                .aliases()
                .iter()
                .any(|alias| columns.iter().any(|col| col.as_str() == *alias))
        })
    }
}
