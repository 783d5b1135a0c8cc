use super::config::*;
use super::rules::{LabelRule, LabelStrategy};
use crate::error::Result;
use polars::prelude::*;

/// Buy/sell training labels aligned to a bar table; every value is 0.0 or 1.0
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingLabels {
    pub buy: Vec<f64>,
    pub sell: Vec<f64>,
}

impl TrainingLabels {
    pub fn len(&self) -> usize {
        self.buy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buy.is_empty()
    }

    /// Return a copy of `df` with the label columns added (or replaced)
    pub fn attach(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut frame = df.clone();
        frame.with_column(Series::new(TRAIN_BUY.into(), self.buy.as_slice()))?;
        frame.with_column(Series::new(TRAIN_SELL.into(), self.sell.as_slice()))?;
        Ok(frame)
    }
}

/// Null means "could not be evaluated" (missing value, lookahead past the end)
fn as_label(condition: Expr) -> Expr {
    condition.fill_null(lit(false)).cast(DataType::Float64)
}

fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    Ok(df
        .column(name)?
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect())
}

/// Evaluate a rule's buy and sell conditions over the whole table
pub fn generate_labels<R: LabelRule + ?Sized>(
    rule: &R,
    df: &DataFrame,
    params: &LabelParams,
) -> Result<TrainingLabels> {
    let labels = df
        .clone()
        .lazy()
        .select([
            as_label(rule.buy_condition(params)).alias(TRAIN_BUY),
            as_label(rule.sell_condition(params)).alias(TRAIN_SELL),
        ])
        .collect()?;

    Ok(TrainingLabels {
        buy: column_values(&labels, TRAIN_BUY)?,
        sell: column_values(&labels, TRAIN_SELL)?,
    })
}

/// Copy each named column to `%<name>` for plotting. Columns the table does
/// not carry are skipped.
pub fn add_debug_indicators(df: DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let names = df.get_column_names();
    let copies: Vec<Expr> = columns
        .iter()
        .filter(|&&name| {
            let present = names.iter().any(|c| c.as_str() == name);
            if !present {
                log::debug!("Debug indicator '{}' not in table, skipping", name);
            }
            present
        })
        .map(|&name| col(name).alias(debug_name(name)))
        .collect();

    if copies.is_empty() {
        return Ok(df);
    }

    Ok(df.lazy().with_columns(copies).collect()?)
}

#[derive(Debug, Clone)]
pub struct LabeledFrame {
    pub frame: DataFrame,
    pub stats: LabelStats,
}

pub struct Labeler<R: LabelRule = LabelStrategy> {
    rule: R,
    params: LabelParams,
    debug_indicators: bool,
}

impl<R: LabelRule> Labeler<R> {
    pub fn new(rule: R, params: LabelParams) -> Self {
        Self {
            rule,
            params,
            debug_indicators: false,
        }
    }

    pub fn with_debug_indicators(mut self, enabled: bool) -> Self {
        self.debug_indicators = enabled;
        self
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    pub fn params(&self) -> &LabelParams {
        &self.params
    }

    pub fn generate(&self, df: &DataFrame) -> Result<TrainingLabels> {
        generate_labels(&self.rule, df, &self.params)
    }

    /// Label the table and report the resulting class distribution
    pub fn label(&self, df: &DataFrame) -> Result<LabeledFrame> {
        log::debug!(
            "Labeling {} rows with {} (lookahead {})",
            df.height(),
            self.rule.name(),
            self.params.lookahead
        );

        let labels = self.generate(df)?;
        let stats = LabelStats::from_labels(&labels.buy, &labels.sell);

        log::info!(
            "{}: {} buys ({:.2}%), {} sells ({:.2}%), {} holds",
            self.rule.name(),
            stats.buy_count,
            stats.buy_pct,
            stats.sell_count,
            stats.sell_pct,
            stats.hold_count
        );
        if stats.total_count > 0 && stats.buy_count == 0 {
            log::warn!("{} produced no buy labels", self.rule.name());
        }
        if stats.total_count > 0 && stats.sell_count == 0 {
            log::warn!("{} produced no sell labels", self.rule.name());
        }

        let mut frame = labels.attach(df)?;
        if self.debug_indicators {
            let mut columns = self.rule.debug_columns().to_vec();
            columns.extend([TRAIN_BUY, TRAIN_SELL]);
            frame = add_debug_indicators(frame, &columns)?;
        }

        Ok(LabeledFrame { frame, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::labeling::TrendCrossover;
    use polars::df;

    fn trend_table() -> DataFrame {
        df! {
            "dwt_diff" => &[-2.0, -1.0, 1.0, 2.0, 1.0],
            "loss_threshold" => &[-1.0, -1.0, -1.0, -1.0, -1.0],
            "profit_threshold" => &[1.0, 1.0, 1.0, 1.0, 1.0],
            "future_profit_max" => &[2.0, 2.0, 2.0, 2.0, 2.0],
            "future_loss_min" => &[-2.0, -2.0, -2.0, -2.0, -2.0],
            "future_max" => &[3.0, 3.0, 3.0, 3.0, 3.0],
        }
        .unwrap()
    }

    #[test]
    fn test_trend_crossover_fixture() {
        let labels = generate_labels(&TrendCrossover, &trend_table(), &LabelParams::new(1)).unwrap();

        // Row 1: -1 < 0, -1 <= -1, next row is 1 > 0, 2 >= 1
        assert_eq!(labels.buy, vec![0.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(labels.sell, vec![0.0; 5]);
    }

    #[test]
    fn test_label_attaches_columns() {
        let df = trend_table();
        let labeler = Labeler::new(TrendCrossover, LabelParams::new(1));
        let labeled = labeler.label(&df).unwrap();

        assert_eq!(labeled.frame.height(), df.height());
        assert!(labeled.frame.column(TRAIN_BUY).is_ok());
        assert!(labeled.frame.column(TRAIN_SELL).is_ok());
        assert_eq!(labeled.stats.buy_count, 1);
        // input untouched
        assert!(df.column(TRAIN_BUY).is_err());
    }

    #[test]
    fn test_debug_indicators_skip_missing_columns() {
        let labeler = Labeler::new(TrendCrossover, LabelParams::new(1)).with_debug_indicators(true);
        let labeled = labeler.label(&trend_table()).unwrap();

        assert!(labeled.frame.column("%future_max").is_ok());
        assert!(labeled.frame.column("%future_min").is_err());
        assert!(labeled.frame.column("%train_buy").is_ok());
        assert!(labeled.frame.column("%train_sell").is_ok());
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let df = df! { "dwt_diff" => &[1.0, -1.0] }.unwrap();
        let result = generate_labels(&TrendCrossover, &df, &LabelParams::new(1));
        assert!(result.is_err());
    }
}
