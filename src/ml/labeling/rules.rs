use super::config::{LabelParams, LabelStrategyKind};
use super::oscillator_threshold::OscillatorThreshold;
use super::trend_crossover::TrendCrossover;
use polars::prelude::*;

/// A rule deciding which historical rows are buy or sell training examples.
///
/// Conditions are polars expressions over the bar table. They may evaluate
/// to null (e.g. a lookahead shift past the end of the table); the labeler
/// treats null as "not matched".
pub trait LabelRule {
    fn name(&self) -> &'static str;

    fn buy_condition(&self, params: &LabelParams) -> Expr;

    fn sell_condition(&self, params: &LabelParams) -> Expr;

    /// Columns the conditions read; they must exist on the bar table
    fn required_columns(&self) -> &'static [&'static str];

    /// Intermediate columns worth copying out for plotting
    fn debug_columns(&self) -> &'static [&'static str];
}

/// The rule variants selectable from configuration
#[derive(Debug, Clone, PartialEq)]
pub enum LabelStrategy {
    TrendCrossover(TrendCrossover),
    OscillatorThreshold(OscillatorThreshold),
}

impl LabelStrategy {
    pub fn from_kind(kind: LabelStrategyKind, oscillator_extreme: f64) -> Self {
        match kind {
            LabelStrategyKind::TrendCrossover => LabelStrategy::TrendCrossover(TrendCrossover),
            LabelStrategyKind::OscillatorThreshold => {
                LabelStrategy::OscillatorThreshold(OscillatorThreshold::new(oscillator_extreme))
            }
        }
    }

    pub fn kind(&self) -> LabelStrategyKind {
        match self {
            LabelStrategy::TrendCrossover(_) => LabelStrategyKind::TrendCrossover,
            LabelStrategy::OscillatorThreshold(_) => LabelStrategyKind::OscillatorThreshold,
        }
    }
}

impl LabelRule for LabelStrategy {
    fn name(&self) -> &'static str {
        match self {
            LabelStrategy::TrendCrossover(rule) => rule.name(),
            LabelStrategy::OscillatorThreshold(rule) => rule.name(),
        }
    }

    fn buy_condition(&self, params: &LabelParams) -> Expr {
        match self {
            LabelStrategy::TrendCrossover(rule) => rule.buy_condition(params),
            LabelStrategy::OscillatorThreshold(rule) => rule.buy_condition(params),
        }
    }

    fn sell_condition(&self, params: &LabelParams) -> Expr {
        match self {
            LabelStrategy::TrendCrossover(rule) => rule.sell_condition(params),
            LabelStrategy::OscillatorThreshold(rule) => rule.sell_condition(params),
        }
    }

    fn required_columns(&self) -> &'static [&'static str] {
        match self {
            LabelStrategy::TrendCrossover(rule) => rule.required_columns(),
            LabelStrategy::OscillatorThreshold(rule) => rule.required_columns(),
        }
    }

    fn debug_columns(&self) -> &'static [&'static str] {
        match self {
            LabelStrategy::TrendCrossover(rule) => rule.debug_columns(),
            LabelStrategy::OscillatorThreshold(rule) => rule.debug_columns(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_from_kind() {
        let trend = LabelStrategy::from_kind(LabelStrategyKind::TrendCrossover, 0.8);
        assert_eq!(trend.kind(), LabelStrategyKind::TrendCrossover);
        assert_eq!(trend.name(), "trend_crossover");

        let osc = LabelStrategy::from_kind(LabelStrategyKind::OscillatorThreshold, 0.7);
        assert_eq!(
            osc,
            LabelStrategy::OscillatorThreshold(OscillatorThreshold::new(0.7))
        );
    }
}
