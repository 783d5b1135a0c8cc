use crate::error::Result;
use crate::utils::hours_to_bars;
use serde::{Deserialize, Serialize};

// Label columns added to the bar table
pub const TRAIN_BUY: &str = "train_buy";
pub const TRAIN_SELL: &str = "train_sell";

// Columns supplied by the host before labeling
pub const DWT_DIFF: &str = "dwt_diff";
pub const FISHER_WR: &str = "fisher_wr";
pub const BB_GAIN: &str = "bb_gain";
pub const BB_LOSS: &str = "bb_loss";
pub const PROFIT_THRESHOLD: &str = "profit_threshold";
pub const LOSS_THRESHOLD: &str = "loss_threshold";
pub const FUTURE_PROFIT_MAX: &str = "future_profit_max";
pub const FUTURE_LOSS_MIN: &str = "future_loss_min";
pub const FUTURE_GAIN: &str = "future_gain";
pub const FUTURE_MAX: &str = "future_max";
pub const FUTURE_MIN: &str = "future_min";

/// Prefix for diagnostic copies of columns, picked up by the charting layer
pub const DEBUG_PREFIX: &str = "%";

pub fn debug_name(column: &str) -> String {
    format!("{}{}", DEBUG_PREFIX, column)
}

/// Per-run parameters supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelParams {
    pub lookahead: usize, // rows
}

impl LabelParams {
    pub fn new(lookahead: usize) -> Self {
        Self { lookahead }
    }

    /// Derive the lookahead from a horizon in hours and the table's timeframe.
    pub fn from_hours(lookahead_hours: f64, timeframe: &str) -> Result<Self> {
        Ok(Self {
            lookahead: hours_to_bars(lookahead_hours, timeframe)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStrategyKind {
    TrendCrossover,
    OscillatorThreshold,
}

impl LabelStrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelStrategyKind::TrendCrossover => "trend_crossover",
            LabelStrategyKind::OscillatorThreshold => "oscillator_threshold",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelStats {
    pub total_count: usize,
    pub buy_count: usize,
    pub sell_count: usize,
    pub hold_count: usize,
    pub buy_pct: f64,
    pub sell_pct: f64,
    pub hold_pct: f64,
}

impl LabelStats {
    pub fn from_labels(buy: &[f64], sell: &[f64]) -> Self {
        let total_count = buy.len();
        let buy_count = buy.iter().filter(|&&v| v > 0.0).count();
        let sell_count = sell.iter().filter(|&&v| v > 0.0).count();
        let labeled = buy
            .iter()
            .zip(sell.iter())
            .filter(|(&b, &s)| b > 0.0 || s > 0.0)
            .count();
        let hold_count = total_count - labeled;

        let pct = |count: usize| {
            if total_count == 0 {
                0.0
            } else {
                (count as f64 / total_count as f64) * 100.0
            }
        };

        Self {
            total_count,
            buy_count,
            sell_count,
            hold_count,
            buy_pct: pct(buy_count),
            sell_pct: pct(sell_count),
            hold_pct: pct(hold_count),
        }
    }
}
