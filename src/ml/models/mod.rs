//! Wavenet classifier: the graph description, its builder, and an
//! inference interpreter.

pub mod activations;
pub mod graph;
pub mod layers;
pub mod model;
pub mod wavenet;

pub use activations::Activation;
pub use graph::{GraphBuilder, LayerSpec, ModelGraph, Node, NodeId, Padding, Shape};
pub use model::{TrinaryClass, WavenetModel};
pub use wavenet::{build_wavenet, ModelShape, WavenetBuilder, WavenetConfig};
