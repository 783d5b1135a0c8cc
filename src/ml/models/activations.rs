use serde::{Deserialize, Serialize};

#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[inline]
pub fn relu(x: f64) -> f64 {
    x.max(0.0)
}

/// Numerically stable softmax, in place
pub fn softmax_in_place(x: &mut [f64]) {
    let max_val = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for v in x.iter_mut() {
        *v = (*v - max_val).exp();
        sum += *v;
    }
    for v in x.iter_mut() {
        *v /= sum;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Tanh,
    Sigmoid,
    /// Normalises over the channel axis of each time step
    Softmax,
}

impl Activation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Activation::Linear => "linear",
            Activation::Relu => "relu",
            Activation::Tanh => "tanh",
            Activation::Sigmoid => "sigmoid",
            Activation::Softmax => "softmax",
        }
    }

    /// Apply to one time step (a row of channels)
    pub fn apply(&self, row: &mut [f64]) {
        match self {
            Activation::Linear => {}
            Activation::Relu => row.iter_mut().for_each(|v| *v = relu(*v)),
            Activation::Tanh => row.iter_mut().for_each(|v| *v = v.tanh()),
            Activation::Sigmoid => row.iter_mut().for_each(|v| *v = sigmoid(*v)),
            Activation::Softmax => softmax_in_place(row),
        }
    }
}
