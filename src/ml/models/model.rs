use super::graph::{LayerSpec, ModelGraph, Shape};
use super::layers::{BatchNorm, Conv1D, Dense, Tensor};
use crate::error::{NntcError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Default mapping of output indices to trade decisions. The classifier that
/// trains the network owns the real mapping; this one is only used by
/// `predict_classes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrinaryClass {
    Sell = 0,
    Hold = 1,
    Buy = 2,
}

impl TrinaryClass {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(TrinaryClass::Sell),
            1 => Some(TrinaryClass::Hold),
            2 => Some(TrinaryClass::Buy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
enum LayerWeights {
    Stateless,
    Conv(Conv1D),
    Dense(Dense),
    BatchNorm(BatchNorm),
}

/// A `ModelGraph` instantiated with weights, able to run inference
#[derive(Debug, Clone)]
pub struct WavenetModel {
    graph: ModelGraph,
    shapes: Vec<Shape>,
    weights: Vec<LayerWeights>,
    seed: u64,
}

impl WavenetModel {
    /// Allocate weights for every layer. The same graph and seed always give
    /// the same weights.
    pub fn initialize(graph: &ModelGraph, seed: u64) -> Result<Self> {
        let shapes = graph.shapes()?;
        let mut rng = StdRng::seed_from_u64(seed);

        let weights = graph
            .nodes
            .iter()
            .map(|node| {
                let channels_in = node.inputs.first().map(|i| shapes[i.0].1).unwrap_or(0);
                match &node.layer {
                    LayerSpec::Conv1D {
                        filters,
                        kernel_size,
                        dilation,
                        padding,
                        activation,
                    } => LayerWeights::Conv(Conv1D::new(
                        &mut rng,
                        channels_in,
                        *filters,
                        *kernel_size,
                        *dilation,
                        *padding,
                        *activation,
                    )),
                    LayerSpec::Dense { units, activation } => {
                        LayerWeights::Dense(Dense::new(&mut rng, channels_in, *units, *activation))
                    }
                    LayerSpec::BatchNorm { epsilon } => {
                        LayerWeights::BatchNorm(BatchNorm::new(channels_in, *epsilon))
                    }
                    _ => LayerWeights::Stateless,
                }
            })
            .collect();

        log::debug!(
            "Initialised {} layers with seed {} ({} params)",
            graph.len(),
            seed,
            graph.param_count()?
        );

        Ok(Self {
            graph: graph.clone(),
            shapes,
            weights,
            seed,
        })
    }

    pub fn graph(&self) -> &ModelGraph {
        &self.graph
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn input_shape(&self) -> Shape {
        self.shapes[self.graph.input.0]
    }

    pub fn output_shape(&self) -> Shape {
        self.shapes[self.graph.output.0]
    }

    /// Run one window `[seq_len][features]` through the network.
    /// Returns `[seq_len][classes]` probabilities.
    pub fn forward(&self, input: &[Vec<f64>]) -> Result<Tensor> {
        let (seq_len, features) = self.input_shape();
        if input.len() != seq_len || input.iter().any(|row| row.len() != features) {
            let actual_features = input.first().map(|r| r.len()).unwrap_or(0);
            return Err(NntcError::Shape {
                expected: format!("({}, {})", seq_len, features),
                actual: format!("({}, {})", input.len(), actual_features),
            });
        }

        let mut outputs: Vec<Option<Tensor>> = vec![None; self.graph.len()];
        for (node, weights) in self.graph.nodes.iter().zip(self.weights.iter()) {
            let value = {
                let args: Vec<&Tensor> = node
                    .inputs
                    .iter()
                    .map(|i| {
                        outputs[i.0].as_ref().ok_or_else(|| {
                            NntcError::Graph(format!("Node '{}' evaluated before its inputs", node.name))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;

                match (&node.layer, weights) {
                    (LayerSpec::Input { .. }, _) => input.to_vec(),
                    (LayerSpec::Conv1D { .. }, LayerWeights::Conv(conv)) => conv.forward(args[0]),
                    (LayerSpec::Dense { .. }, LayerWeights::Dense(dense)) => dense.forward(args[0]),
                    (LayerSpec::BatchNorm { .. }, LayerWeights::BatchNorm(bn)) => bn.forward(args[0]),
                    (LayerSpec::Activation { function }, _) => {
                        let mut value = args[0].clone();
                        value.iter_mut().for_each(|row| function.apply(row));
                        value
                    }
                    (LayerSpec::Add, _) => combine(&args, |a, b| a + b),
                    (LayerSpec::Multiply, _) => combine(&args, |a, b| a * b),
                    (layer, _) => {
                        return Err(NntcError::Graph(format!(
                            "No weights allocated for {} '{}'",
                            layer.kind(),
                            node.name
                        )))
                    }
                }
            };
            outputs[node.id.0] = Some(value);
        }

        outputs[self.graph.output.0]
            .take()
            .ok_or_else(|| NntcError::Graph("Output node was not evaluated".to_string()))
    }

    /// Most probable class at every time step
    pub fn predict_classes(&self, input: &[Vec<f64>]) -> Result<Vec<TrinaryClass>> {
        let probabilities = self.forward(input)?;
        probabilities
            .iter()
            .map(|row| {
                let best = row
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.total_cmp(b.1))
                    .map(|(i, _)| i)
                    .unwrap_or(1);
                TrinaryClass::from_index(best).ok_or_else(|| NntcError::Shape {
                    expected: "3 classes".to_string(),
                    actual: format!("{} classes", row.len()),
                })
            })
            .collect()
    }
}

/// Elementwise fold over same-shaped tensors
fn combine(args: &[&Tensor], op: impl Fn(f64, f64) -> f64) -> Tensor {
    let mut acc = args[0].clone();
    for other in &args[1..] {
        for (acc_row, row) in acc.iter_mut().zip(other.iter()) {
            for (a, &b) in acc_row.iter_mut().zip(row.iter()) {
                *a = op(*a, b);
            }
        }
    }
    acc
}
