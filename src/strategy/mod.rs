pub mod parameters;
pub mod plot;
pub mod registry;
pub mod variants;

pub use parameters::{HyperParameter, Space};
pub use plot::{PlotConfig, PlotLine};
pub use registry::StrategyRegistry;
pub use variants::{ClassifierKind, StrategyVariant, TrainingSettings};
