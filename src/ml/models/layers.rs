//! Weight-holding layers used by the graph interpreter.
//!
//! Tensors are `[time][channel]`, matching the `(seq_len, features)` input
//! layout.

use super::activations::Activation;
use super::graph::Padding;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rayon::prelude::*;

pub type Tensor = Vec<Vec<f64>>;

/// Glorot/Xavier uniform initialisation
fn glorot_uniform<R: Rng>(rng: &mut R, fan_in: usize, fan_out: usize, len: usize) -> Vec<f64> {
    let limit = (6.0 / (fan_in + fan_out) as f64).sqrt();
    let dist = Uniform::new_inclusive(-limit, limit);
    (0..len).map(|_| dist.sample(rng)).collect()
}

/// 1D convolution with dilation, channels-last
#[derive(Debug, Clone)]
pub struct Conv1D {
    pub kernel: Vec<f64>, // [kernel_size][channels_in][filters]
    pub bias: Vec<f64>,
    pub kernel_size: usize,
    pub dilation: usize,
    pub channels_in: usize,
    pub filters: usize,
    pub padding: Padding,
    pub activation: Activation,
}

impl Conv1D {
    pub fn new<R: Rng>(
        rng: &mut R,
        channels_in: usize,
        filters: usize,
        kernel_size: usize,
        dilation: usize,
        padding: Padding,
        activation: Activation,
    ) -> Self {
        let kernel = glorot_uniform(
            rng,
            kernel_size * channels_in,
            kernel_size * filters,
            kernel_size * channels_in * filters,
        );

        Self {
            kernel,
            bias: vec![0.0; filters],
            kernel_size,
            dilation,
            channels_in,
            filters,
            padding,
            activation,
        }
    }

    /// Zeros prepended to the sequence before the first tap
    fn left_padding(&self) -> usize {
        let span = (self.kernel_size - 1) * self.dilation;
        match self.padding {
            Padding::Causal => span,
            Padding::Same => span / 2,
        }
    }

    #[inline]
    fn weight(&self, tap: usize, c_in: usize, f: usize) -> f64 {
        self.kernel[(tap * self.channels_in + c_in) * self.filters + f]
    }

    /// Output has the same length as the input. With causal padding, step `t`
    /// only sees inputs at `t` or earlier.
    pub fn forward(&self, input: &Tensor) -> Tensor {
        let seq_len = input.len();
        let pad = self.left_padding() as isize;

        (0..seq_len)
            .into_par_iter()
            .map(|t| {
                let mut out = self.bias.clone();
                for tap in 0..self.kernel_size {
                    let src = t as isize + (tap * self.dilation) as isize - pad;
                    if src < 0 || src >= seq_len as isize {
                        continue;
                    }
                    let row = &input[src as usize];
                    for (c_in, &x) in row.iter().enumerate() {
                        if x == 0.0 {
                            continue;
                        }
                        for (f, o) in out.iter_mut().enumerate() {
                            *o += self.weight(tap, c_in, f) * x;
                        }
                    }
                }
                self.activation.apply(&mut out);
                out
            })
            .collect()
    }

    pub fn receptive_field(&self) -> usize {
        (self.kernel_size - 1) * self.dilation + 1
    }
}

/// Fully connected layer applied independently at every time step
#[derive(Debug, Clone)]
pub struct Dense {
    pub weights: Vec<f64>, // [in_features][units]
    pub bias: Vec<f64>,
    pub in_features: usize,
    pub units: usize,
    pub activation: Activation,
}

impl Dense {
    pub fn new<R: Rng>(rng: &mut R, in_features: usize, units: usize, activation: Activation) -> Self {
        Self {
            weights: glorot_uniform(rng, in_features, units, in_features * units),
            bias: vec![0.0; units],
            in_features,
            units,
            activation,
        }
    }

    pub fn forward_row(&self, row: &[f64]) -> Vec<f64> {
        let mut out = self.bias.clone();
        for (i, &x) in row.iter().enumerate() {
            let w = &self.weights[i * self.units..(i + 1) * self.units];
            for (o, &wv) in out.iter_mut().zip(w.iter()) {
                *o += wv * x;
            }
        }
        self.activation.apply(&mut out);
        out
    }

    pub fn forward(&self, input: &Tensor) -> Tensor {
        input.par_iter().map(|row| self.forward_row(row)).collect()
    }
}

/// Batch normalisation in inference mode, using moving statistics
#[derive(Debug, Clone)]
pub struct BatchNorm {
    pub gamma: Vec<f64>,
    pub beta: Vec<f64>,
    pub moving_mean: Vec<f64>,
    pub moving_variance: Vec<f64>,
    pub epsilon: f64,
}

impl BatchNorm {
    pub fn new(channels: usize, epsilon: f64) -> Self {
        Self {
            gamma: vec![1.0; channels],
            beta: vec![0.0; channels],
            moving_mean: vec![0.0; channels],
            moving_variance: vec![1.0; channels],
            epsilon,
        }
    }

    pub fn forward(&self, input: &Tensor) -> Tensor {
        input
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(c, &x)| {
                        let std = (self.moving_variance[c] + self.epsilon).sqrt();
                        (x - self.moving_mean[c]) / std * self.gamma[c] + self.beta[c]
                    })
                    .collect()
            })
            .collect()
    }
}
