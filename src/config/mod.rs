pub mod labeling;
pub mod manager;
pub mod model;
pub mod traits;

pub use labeling::LabelingConfig;
pub use manager::{AppConfig, ConfigManager};
pub use model::ModelConfig;
pub use traits::{ConfigManifest, ConfigSection, FieldManifest};
