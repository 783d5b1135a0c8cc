pub mod config;
pub mod labeler;
pub mod oscillator_threshold;
pub mod rules;
pub mod trend_crossover;

pub use config::{LabelParams, LabelStats, LabelStrategyKind, TRAIN_BUY, TRAIN_SELL};
pub use labeler::{add_debug_indicators, generate_labels, LabeledFrame, Labeler, TrainingLabels};
pub use oscillator_threshold::OscillatorThreshold;
pub use rules::{LabelRule, LabelStrategy};
pub use trend_crossover::TrendCrossover;
