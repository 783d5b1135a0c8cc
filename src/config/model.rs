use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::{NntcError, Result};
use crate::ml::models::ModelShape;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub seq_len: usize,
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            seq_len: 32,
            seed: 42,
        }
    }
}

impl ModelConfig {
    pub fn shape(&self, num_features: usize) -> ModelShape {
        ModelShape::new(self.seq_len, num_features)
    }
}

impl ConfigSection for ModelConfig {
    fn section_name() -> &'static str {
        "model"
    }

    fn validate(&self) -> Result<()> {
        if self.seq_len == 0 {
            return Err(NntcError::Configuration(
                "Sequence length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Model".to_string(),
            fields: vec![
                FieldManifest::new(
                    "seq_len",
                    "integer",
                    serde_json::json!(self.seq_len),
                    "Rows in each sliding window fed to the network",
                )
                .with_range(1.0, 4096.0),
                FieldManifest::new(
                    "seed",
                    "integer",
                    serde_json::json!(self.seed),
                    "Seed for weight initialisation",
                ),
            ],
        }
    }
}
