use super::parameters::{exit_parameters, HyperParameter};
use super::plot::PlotConfig;
use crate::error::Result;
use crate::ml::labeling::oscillator_threshold::DEFAULT_OSCILLATOR_EXTREME;
use crate::ml::labeling::{LabelParams, LabelStrategy, LabelStrategyKind, Labeler};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifierKind {
    Wavenet,
    #[serde(rename = "LSTM")]
    Lstm,
}

impl ClassifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierKind::Wavenet => "Wavenet",
            ClassifierKind::Lstm => "LSTM",
        }
    }
}

/// Constants controlling how much training data the label rule produces.
///
/// They feed the host's indicator pass, which runs once per optimisation, so
/// they are fixed per variant rather than hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSettings {
    pub lookahead_hours: f64,
    pub n_profit_stddevs: f64,
    pub n_loss_stddevs: f64,
    pub min_f1_score: f64,
}

/// A concrete strategy: label rule plus the metadata the host needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyVariant {
    pub name: String,
    pub description: String,
    pub label_strategy: LabelStrategyKind,
    pub classifier: ClassifierKind,
    pub training: TrainingSettings,
    pub plot_config: PlotConfig,
    pub parameters: Vec<HyperParameter>,
}

fn training_plot() -> PlotConfig {
    PlotConfig::new()
        .subplot_line("Diff", "%train_buy", "mediumaquamarine")
        .subplot_line("Diff", "predict_buy", "cornflowerblue")
        .subplot_line("Diff", "%train_sell", "salmon")
        .subplot_line("Diff", "predict_sell", "orange")
}

impl StrategyVariant {
    /// Trend-crossover labels on the DWT differential, Wavenet classifier
    pub fn dwt_wavenet() -> Self {
        Self {
            name: "NNTC_dwt_Wavenet".to_string(),
            description: "Trains a Wavenet classifier on DWT trend crossovers".to_string(),
            label_strategy: LabelStrategyKind::TrendCrossover,
            classifier: ClassifierKind::Wavenet,
            training: TrainingSettings {
                lookahead_hours: 0.5,
                n_profit_stddevs: 1.0,
                n_loss_stddevs: 2.0,
                min_f1_score: 0.70,
            },
            plot_config: training_plot(),
            parameters: exit_parameters(),
        }
    }

    /// Fisher/Williams %R and bollinger-band labels, LSTM classifier
    pub fn fbb_lstm() -> Self {
        Self {
            name: "NNTC_fbb_LSTM".to_string(),
            description: "Trains an LSTM classifier on Fisher/WR and bollinger band extremes"
                .to_string(),
            label_strategy: LabelStrategyKind::OscillatorThreshold,
            classifier: ClassifierKind::Lstm,
            training: TrainingSettings {
                lookahead_hours: 1.0,
                n_profit_stddevs: 1.5,
                n_loss_stddevs: 2.0,
                min_f1_score: 0.70,
            },
            plot_config: training_plot()
                .subplot_line("Diff", "fisher_wr", "plum")
                .subplot_line("Diff", "bb_gain", "sandybrown")
                .subplot_line("Diff", "bb_loss", "rosybrown"),
            parameters: exit_parameters(),
        }
    }

    pub fn plot_config(&self) -> &PlotConfig {
        &self.plot_config
    }

    pub fn parameters(&self) -> &[HyperParameter] {
        &self.parameters
    }

    pub fn all() -> Vec<Self> {
        vec![Self::dwt_wavenet(), Self::fbb_lstm()]
    }

    pub fn label_rule(&self) -> LabelStrategy {
        LabelStrategy::from_kind(self.label_strategy, DEFAULT_OSCILLATOR_EXTREME)
    }

    pub fn label_params(&self, timeframe: &str) -> Result<LabelParams> {
        LabelParams::from_hours(self.training.lookahead_hours, timeframe)
    }

    /// Labeler configured with this variant's rule and lookahead
    pub fn labeler(&self, timeframe: &str) -> Result<Labeler<LabelStrategy>> {
        Ok(Labeler::new(self.label_rule(), self.label_params(timeframe)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NntcError;

    #[test]
    fn test_lookahead_on_5m() {
        let dwt = StrategyVariant::dwt_wavenet();
        assert_eq!(dwt.label_params("5m").unwrap().lookahead, 6);

        let fbb = StrategyVariant::fbb_lstm();
        assert_eq!(fbb.label_params("5m").unwrap().lookahead, 12);
    }

    #[test]
    fn test_variant_lookahead_shorter_than_a_bar() {
        // 0.5 hours fits no 1h bar; 1 hour fits exactly one
        assert!(matches!(
            StrategyVariant::dwt_wavenet().labeler("1h"),
            Err(NntcError::Configuration(_))
        ));
        assert_eq!(
            StrategyVariant::fbb_lstm().labeler("1h").unwrap().params().lookahead,
            1
        );
    }

    #[test]
    fn test_classifier_names_match_serde() {
        for kind in [ClassifierKind::Wavenet, ClassifierKind::Lstm] {
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::json!(kind.as_str())
            );
        }
    }

    #[test]
    fn test_variant_rules() {
        assert_eq!(
            StrategyVariant::dwt_wavenet().label_rule().kind(),
            LabelStrategyKind::TrendCrossover
        );
        assert_eq!(
            StrategyVariant::fbb_lstm().label_rule().kind(),
            LabelStrategyKind::OscillatorThreshold
        );
    }

    #[test]
    fn test_plot_configs_reference_debug_labels() {
        for variant in StrategyVariant::all() {
            let columns = variant.plot_config.columns();
            assert!(columns.contains(&"%train_buy"));
            assert!(columns.contains(&"%train_sell"));
        }
        assert!(StrategyVariant::fbb_lstm().plot_config.columns().contains(&"fisher_wr"));
    }
}
