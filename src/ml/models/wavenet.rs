//! Wavenet trinary classifier: stacked dilated causal convolutions with gated
//! activation units, residual and skip connections.

use super::activations::Activation;
use super::graph::{GraphBuilder, LayerSpec, ModelGraph, NodeId, Padding};
use crate::error::{NntcError, Result};
use serde::{Deserialize, Serialize};

pub const FILTERS: usize = 64;
pub const KERNEL_SIZE: usize = 2;
pub const NUM_STACKS: usize = 2;
pub const BLOCKS_PER_STACK: usize = 9;
pub const NUM_CLASSES: usize = 3;
pub const BATCH_NORM_EPSILON: f64 = 1e-3;

/// Sliding window fed to the network: (sequence length, feature count)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelShape {
    pub seq_len: usize,
    pub num_features: usize,
}

impl ModelShape {
    pub fn new(seq_len: usize, num_features: usize) -> Self {
        Self {
            seq_len,
            num_features,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WavenetConfig {
    pub filters: usize,
    pub kernel_size: usize,
    pub num_stacks: usize,
    pub blocks_per_stack: usize,
    pub num_classes: usize,
}

impl Default for WavenetConfig {
    fn default() -> Self {
        Self {
            filters: FILTERS,
            kernel_size: KERNEL_SIZE,
            num_stacks: NUM_STACKS,
            blocks_per_stack: BLOCKS_PER_STACK,
            num_classes: NUM_CLASSES,
        }
    }
}

impl WavenetConfig {
    /// Dilation rates within one stack: 1, 2, 4, ... doubling per block
    pub fn dilations(&self) -> Vec<usize> {
        (0..self.blocks_per_stack).map(|i| 1usize << i).collect()
    }

    /// Initial convolution plus every gated block
    pub fn receptive_field(&self) -> usize {
        let per_stack: usize = self.dilations().iter().sum();
        1 + self.kernel_size.saturating_sub(1) * (1 + per_stack * self.num_stacks)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WavenetBuilder {
    config: WavenetConfig,
}

impl WavenetBuilder {
    pub fn new(config: WavenetConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WavenetConfig {
        &self.config
    }

    fn conv(&self, kernel_size: usize, dilation: usize, padding: Padding, activation: Activation) -> LayerSpec {
        LayerSpec::Conv1D {
            filters: self.config.filters,
            kernel_size,
            dilation,
            padding,
            activation,
        }
    }

    /// One gated residual block. Returns (residual output, skip output).
    fn gated_block(&self, g: &mut GraphBuilder, prefix: &str, x: NodeId, dilation: usize) -> (NodeId, NodeId) {
        let k = self.config.kernel_size;
        let tanh_out = g.add(
            format!("{}_tanh", prefix),
            self.conv(k, dilation, Padding::Causal, Activation::Tanh),
            &[x],
        );
        let sigmoid_out = g.add(
            format!("{}_sigmoid", prefix),
            self.conv(k, dilation, Padding::Causal, Activation::Sigmoid),
            &[x],
        );
        let gated = g.add(format!("{}_gate", prefix), LayerSpec::Multiply, &[tanh_out, sigmoid_out]);

        let residual = g.add(
            format!("{}_residual", prefix),
            self.conv(1, 1, Padding::Same, Activation::Linear),
            &[gated],
        );
        let skip = g.add(
            format!("{}_skip", prefix),
            self.conv(1, 1, Padding::Same, Activation::Linear),
            &[gated],
        );
        let out = g.add(format!("{}_residual_add", prefix), LayerSpec::Add, &[x, residual]);

        (out, skip)
    }

    /// Build the classifier graph for the given window shape. Output is
    /// `(seq_len, num_classes)` with a softmax over the class axis.
    pub fn build(&self, shape: ModelShape) -> Result<ModelGraph> {
        if self.config.num_stacks == 0 || self.config.blocks_per_stack == 0 {
            return Err(NntcError::Graph("Wavenet needs at least one gated block".to_string()));
        }
        if self.config.filters == 0 || self.config.kernel_size == 0 || self.config.num_classes == 0 {
            return Err(NntcError::Graph(format!(
                "Wavenet needs positive filters, kernel size and classes, got {:?}",
                self.config
            )));
        }

        let mut g = GraphBuilder::new();
        let input = g.add(
            "input",
            LayerSpec::Input {
                seq_len: shape.seq_len,
                features: shape.num_features,
            },
            &[],
        );

        let mut x = g.add(
            "causal_conv",
            self.conv(self.config.kernel_size, 1, Padding::Causal, Activation::Linear),
            &[input],
        );

        let mut skips = Vec::with_capacity(self.config.num_stacks * self.config.blocks_per_stack);
        for stack in 0..self.config.num_stacks {
            for (block, dilation) in self.config.dilations().into_iter().enumerate() {
                let prefix = format!("s{}_b{}", stack + 1, block + 1);
                let (residual, skip) = self.gated_block(&mut g, &prefix, x, dilation);
                x = residual;
                skips.push(skip);
            }
            x = g.add(
                format!("s{}_batch_norm", stack + 1),
                LayerSpec::BatchNorm {
                    epsilon: BATCH_NORM_EPSILON,
                },
                &[x],
            );
        }

        let mut y = if skips.len() == 1 {
            skips[0]
        } else {
            g.add("skip_sum", LayerSpec::Add, &skips)
        };
        y = g.add("relu_1", LayerSpec::Activation { function: Activation::Relu }, &[y]);
        y = g.add("head_conv_1", self.conv(1, 1, Padding::Same, Activation::Linear), &[y]);
        y = g.add("relu_2", LayerSpec::Activation { function: Activation::Relu }, &[y]);
        y = g.add("head_conv_2", self.conv(1, 1, Padding::Same, Activation::Linear), &[y]);

        // Trinary decision head
        let output = g.add(
            "output",
            LayerSpec::Dense {
                units: self.config.num_classes,
                activation: Activation::Softmax,
            },
            &[y],
        );

        let graph = g.finish(input, output)?;
        log::debug!(
            "Built wavenet graph for {:?}: {} nodes, receptive field {}",
            shape,
            graph.len(),
            graph.receptive_field()?
        );
        Ok(graph)
    }
}

/// Build the default (64 filters, 2 x 9 blocks) classifier graph
pub fn build_wavenet(shape: ModelShape) -> Result<ModelGraph> {
    WavenetBuilder::default().build(shape)
}
