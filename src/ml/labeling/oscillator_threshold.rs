use super::config::*;
use super::rules::LabelRule;
use polars::prelude::*;

pub const DEFAULT_OSCILLATOR_EXTREME: f64 = 0.8;

/// Labels oversold/overbought rows of the Fisher/Williams %R oscillator that
/// the bollinger-band estimate and the realised future gain both confirm.
///
/// Band estimates are compared against `threshold / 100`; the future gain
/// is compared against the raw thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorThreshold {
    pub extreme: f64,
}

impl OscillatorThreshold {
    pub fn new(extreme: f64) -> Self {
        Self { extreme }
    }
}

impl Default for OscillatorThreshold {
    fn default() -> Self {
        Self::new(DEFAULT_OSCILLATOR_EXTREME)
    }
}

impl LabelRule for OscillatorThreshold {
    fn name(&self) -> &'static str {
        "oscillator_threshold"
    }

    fn buy_condition(&self, _params: &LabelParams) -> Expr {
        col(FISHER_WR)
            .lt(lit(-self.extreme))
            .and(col(BB_GAIN).gt_eq(col(PROFIT_THRESHOLD) / lit(100.0)))
            .and(col(FUTURE_PROFIT_MAX).gt_eq(col(PROFIT_THRESHOLD)))
            .and(col(FUTURE_GAIN).gt(lit(0.0)))
    }

    fn sell_condition(&self, _params: &LabelParams) -> Expr {
        col(FISHER_WR)
            .gt(lit(self.extreme))
            .and(col(BB_LOSS).lt_eq(col(LOSS_THRESHOLD) / lit(100.0)))
            .and(col(FUTURE_GAIN).lt_eq(col(LOSS_THRESHOLD)))
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[
            FISHER_WR,
            BB_GAIN,
            BB_LOSS,
            PROFIT_THRESHOLD,
            LOSS_THRESHOLD,
            FUTURE_PROFIT_MAX,
            FUTURE_GAIN,
        ]
    }

    fn debug_columns(&self) -> &'static [&'static str] {
        &[FUTURE_GAIN, FUTURE_PROFIT_MAX, FUTURE_LOSS_MIN]
    }
}
