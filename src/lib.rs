//! Trinary (buy / hold / sell) classifier strategies: training-label
//! generation over enriched bar tables and the Wavenet network that learns
//! from them.

pub mod config;
pub mod data;
pub mod error;
pub mod ml;
pub mod strategy;
pub mod utils;

pub use error::{NntcError, Result};
