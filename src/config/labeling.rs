use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::{NntcError, Result};
use crate::ml::labeling::{LabelParams, LabelStrategy, LabelStrategyKind, Labeler};
use crate::utils::timeframe_to_minutes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelingConfig {
    pub strategy: LabelStrategyKind,
    pub lookahead_hours: f64,
    pub timeframe: String,
    pub oscillator_extreme: f64,
    pub debug_indicators: bool,
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            strategy: LabelStrategyKind::TrendCrossover,
            lookahead_hours: 0.5,
            timeframe: "5m".to_string(),
            oscillator_extreme: 0.8,
            debug_indicators: false,
        }
    }
}

impl LabelingConfig {
    pub fn label_params(&self) -> Result<LabelParams> {
        LabelParams::from_hours(self.lookahead_hours, &self.timeframe)
    }

    pub fn rule(&self) -> LabelStrategy {
        LabelStrategy::from_kind(self.strategy, self.oscillator_extreme)
    }

    pub fn labeler(&self) -> Result<Labeler<LabelStrategy>> {
        Ok(Labeler::new(self.rule(), self.label_params()?).with_debug_indicators(self.debug_indicators))
    }
}

impl ConfigSection for LabelingConfig {
    fn section_name() -> &'static str {
        "labeling"
    }

    fn validate(&self) -> Result<()> {
        if !(self.lookahead_hours > 0.0) {
            return Err(NntcError::Configuration(
                "Lookahead hours must be positive".to_string(),
            ));
        }
        timeframe_to_minutes(&self.timeframe)?;
        self.label_params()?;
        if !(self.oscillator_extreme > 0.0 && self.oscillator_extreme <= 1.0) {
            return Err(NntcError::Configuration(
                "Oscillator extreme must be in (0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Labeling".to_string(),
            fields: vec![
                FieldManifest::new(
                    "strategy",
                    "enum",
                    serde_json::json!(self.strategy.as_str()),
                    "Label rule: trend_crossover or oscillator_threshold",
                ),
                FieldManifest::new(
                    "lookahead_hours",
                    "float",
                    serde_json::json!(self.lookahead_hours),
                    "Horizon examined when deciding whether a row is a good example",
                )
                .with_range(0.0, 48.0),
                FieldManifest::new(
                    "timeframe",
                    "string",
                    serde_json::json!(self.timeframe),
                    "Bar timeframe of the labeled table",
                ),
                FieldManifest::new(
                    "oscillator_extreme",
                    "float",
                    serde_json::json!(self.oscillator_extreme),
                    "Fisher/WR level marking oversold and overbought rows",
                )
                .with_range(0.0, 1.0),
                FieldManifest::new(
                    "debug_indicators",
                    "bool",
                    serde_json::json!(self.debug_indicators),
                    "Copy intermediate columns out as %-prefixed plot columns",
                ),
            ],
        }
    }
}
