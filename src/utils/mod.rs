pub mod timeframe;

pub use timeframe::{hours_to_bars, timeframe_to_duration, timeframe_to_minutes};
