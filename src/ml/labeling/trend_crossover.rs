use super::config::*;
use super::rules::LabelRule;
use polars::prelude::*;

/// Labels rows just before the smoothed trend differential crosses zero.
///
/// Buy: the differential is negative, at or below the loss threshold, turns
/// positive `lookahead` rows later, and the forward maximum profit reaches
/// the profit threshold. Sell mirrors it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrendCrossover;

impl TrendCrossover {
    fn diff_at_lookahead(params: &LabelParams) -> Expr {
        col(DWT_DIFF).shift(lit(-(params.lookahead as i64)))
    }
}

impl LabelRule for TrendCrossover {
    fn name(&self) -> &'static str {
        "trend_crossover"
    }

    fn buy_condition(&self, params: &LabelParams) -> Expr {
        col(DWT_DIFF)
            .lt(lit(0.0))
            .and(col(DWT_DIFF).lt_eq(col(LOSS_THRESHOLD)))
            .and(Self::diff_at_lookahead(params).gt(lit(0.0)))
            .and(col(FUTURE_PROFIT_MAX).gt_eq(col(PROFIT_THRESHOLD)))
    }

    fn sell_condition(&self, params: &LabelParams) -> Expr {
        col(DWT_DIFF)
            .gt(lit(0.0))
            .and(col(DWT_DIFF).gt_eq(col(PROFIT_THRESHOLD)))
            .and(Self::diff_at_lookahead(params).lt(lit(0.0)))
            .and(col(FUTURE_LOSS_MIN).lt_eq(col(LOSS_THRESHOLD)))
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[
            DWT_DIFF,
            PROFIT_THRESHOLD,
            LOSS_THRESHOLD,
            FUTURE_PROFIT_MAX,
            FUTURE_LOSS_MIN,
        ]
    }

    fn debug_columns(&self) -> &'static [&'static str] {
        &[FUTURE_MAX, FUTURE_MIN]
    }
}
