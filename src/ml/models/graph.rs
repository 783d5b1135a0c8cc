//! Data-described layer graphs.
//!
//! A `ModelGraph` is a list of nodes in evaluation order. Each node names a
//! layer spec and the earlier nodes it consumes. The description carries no
//! weights; `WavenetModel` is one interpreter of it, and it serialises to
//! JSON for hosts that build the network with their own tensor library.

use super::activations::Activation;
use crate::error::{NntcError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
    /// Left-pad only; output step t never sees input after t
    Causal,
    Same,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerSpec {
    Input {
        seq_len: usize,
        features: usize,
    },
    #[serde(rename = "conv1d")]
    Conv1D {
        filters: usize,
        kernel_size: usize,
        dilation: usize,
        padding: Padding,
        activation: Activation,
    },
    Multiply,
    Add,
    BatchNorm {
        epsilon: f64,
    },
    Activation {
        function: Activation,
    },
    Dense {
        units: usize,
        activation: Activation,
    },
}

impl LayerSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            LayerSpec::Input { .. } => "Input",
            LayerSpec::Conv1D { .. } => "Conv1D",
            LayerSpec::Multiply => "Multiply",
            LayerSpec::Add => "Add",
            LayerSpec::BatchNorm { .. } => "BatchNorm",
            LayerSpec::Activation { .. } => "Activation",
            LayerSpec::Dense { .. } => "Dense",
        }
    }

    /// Activation applied by the layer itself, if any
    pub fn activation(&self) -> Option<Activation> {
        match self {
            LayerSpec::Conv1D { activation, .. } | LayerSpec::Dense { activation, .. } => {
                Some(*activation)
            }
            LayerSpec::Activation { function } => Some(*function),
            _ => None,
        }
    }

    /// Kind plus activation, as shown in the summary table
    pub fn describe(&self) -> String {
        match self.activation() {
            Some(Activation::Linear) | None => self.kind().to_string(),
            Some(activation) => format!("{}({})", self.kind(), activation.as_str()),
        }
    }

    /// Trainable and non-trainable parameter count, given the input channels
    pub fn param_count(&self, channels_in: usize) -> usize {
        match self {
            LayerSpec::Conv1D {
                filters,
                kernel_size,
                ..
            } => kernel_size * channels_in * filters + filters,
            LayerSpec::BatchNorm { .. } => 4 * channels_in,
            LayerSpec::Dense { units, .. } => channels_in * units + units,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub layer: LayerSpec,
    pub inputs: Vec<NodeId>,
}

/// (sequence length, channels)
pub type Shape = (usize, usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelGraph {
    pub nodes: Vec<Node>,
    pub input: NodeId,
    pub output: NodeId,
}

impl ModelGraph {
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check wiring and infer every node's output shape
    pub fn shapes(&self) -> Result<Vec<Shape>> {
        let mut shapes: Vec<Shape> = Vec::with_capacity(self.nodes.len());

        for (idx, node) in self.nodes.iter().enumerate() {
            if node.id.0 != idx {
                return Err(NntcError::Graph(format!(
                    "Node '{}' has id {} at position {}",
                    node.name, node.id.0, idx
                )));
            }
            let mut input_shapes = Vec::with_capacity(node.inputs.len());
            for input in &node.inputs {
                if input.0 >= idx {
                    return Err(NntcError::Graph(format!(
                        "Node '{}' consumes node {} which is not evaluated before it",
                        node.name, input.0
                    )));
                }
                input_shapes.push(shapes[input.0]);
            }
            shapes.push(Self::infer_shape(node, &input_shapes)?);
        }

        if self.input.0 >= self.nodes.len() || self.output.0 >= self.nodes.len() {
            return Err(NntcError::Graph("Input or output node out of range".to_string()));
        }
        if !matches!(self.node(self.input).layer, LayerSpec::Input { .. }) {
            return Err(NntcError::Graph("Graph input is not an Input layer".to_string()));
        }

        Ok(shapes)
    }

    fn infer_shape(node: &Node, inputs: &[Shape]) -> Result<Shape> {
        let arity = |expected: usize| -> Result<Shape> {
            if inputs.len() != expected {
                return Err(NntcError::Graph(format!(
                    "{} '{}' expects {} input(s), got {}",
                    node.layer.kind(),
                    node.name,
                    expected,
                    inputs.len()
                )));
            }
            Ok(inputs.first().copied().unwrap_or((0, 0)))
        };

        match &node.layer {
            LayerSpec::Input { seq_len, features } => {
                arity(0)?;
                Ok((*seq_len, *features))
            }
            LayerSpec::Conv1D {
                filters,
                kernel_size,
                dilation,
                ..
            } => {
                if *filters == 0 || *kernel_size == 0 || *dilation == 0 {
                    return Err(NntcError::Graph(format!(
                        "Conv1D '{}' needs positive filters, kernel size and dilation",
                        node.name
                    )));
                }
                let (seq_len, _) = arity(1)?;
                Ok((seq_len, *filters))
            }
            LayerSpec::Multiply | LayerSpec::Add => {
                if inputs.len() < 2 {
                    return Err(NntcError::Graph(format!(
                        "{} '{}' needs at least two inputs",
                        node.layer.kind(),
                        node.name
                    )));
                }
                let first = inputs[0];
                if let Some(other) = inputs.iter().find(|s| **s != first) {
                    return Err(NntcError::Shape {
                        expected: format!("{:?}", first),
                        actual: format!("{:?}", other),
                    });
                }
                Ok(first)
            }
            LayerSpec::BatchNorm { .. } | LayerSpec::Activation { .. } => arity(1),
            LayerSpec::Dense { units, .. } => {
                if *units == 0 {
                    return Err(NntcError::Graph(format!("Dense '{}' needs at least one unit", node.name)));
                }
                let (seq_len, _) = arity(1)?;
                Ok((seq_len, *units))
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.shapes().map(|_| ())
    }

    pub fn input_shape(&self) -> Result<Shape> {
        Ok(self.shapes()?[self.input.0])
    }

    pub fn output_shape(&self) -> Result<Shape> {
        Ok(self.shapes()?[self.output.0])
    }

    pub fn param_count(&self) -> Result<usize> {
        let shapes = self.shapes()?;
        Ok(self
            .nodes
            .iter()
            .map(|node| {
                let channels_in = node.inputs.first().map(|i| shapes[i.0].1).unwrap_or(0);
                node.layer.param_count(channels_in)
            })
            .sum())
    }

    /// Number of input steps that can influence one output step
    pub fn receptive_field(&self) -> Result<usize> {
        self.validate()?;
        let mut fields: Vec<usize> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let widest = node.inputs.iter().map(|i| fields[i.0]).max().unwrap_or(1);
            let field = match &node.layer {
                LayerSpec::Conv1D {
                    kernel_size,
                    dilation,
                    ..
                } => widest + (kernel_size - 1) * dilation,
                _ => widest,
            };
            fields.push(field);
        }
        Ok(fields[self.output.0])
    }

    pub fn count_layers(&self, kind: &str) -> usize {
        self.nodes.iter().filter(|n| n.layer.kind() == kind).count()
    }

    /// Per-layer table in the style of a Keras model summary
    pub fn summary(&self) -> Result<String> {
        let shapes = self.shapes()?;
        let mut out = String::new();
        let rule = "=".repeat(82);

        // Writing into a String cannot fail
        let _ = writeln!(out, "{:<24} {:<20} {:<12} {:>10}  {}", "Layer", "Type", "Output", "Params", "Inputs");
        let _ = writeln!(out, "{}", rule);
        for node in &self.nodes {
            let channels_in = node.inputs.first().map(|i| shapes[i.0].1).unwrap_or(0);
            let inputs: Vec<&str> = node
                .inputs
                .iter()
                .map(|i| self.node(*i).name.as_str())
                .collect();
            let inputs = if inputs.len() > 3 {
                format!("{} nodes", inputs.len())
            } else {
                inputs.join(", ")
            };
            let _ = writeln!(
                out,
                "{:<24} {:<20} {:<12} {:>10}  {}",
                node.name,
                node.layer.describe(),
                format!("({}, {})", shapes[node.id.0].0, shapes[node.id.0].1),
                node.layer.param_count(channels_in),
                inputs
            );
        }
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "Total params: {}", self.param_count()?);
        let _ = writeln!(out, "Receptive field: {}", self.receptive_field()?);
        Ok(out)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let graph: ModelGraph = serde_json::from_str(json)?;
        graph.validate()?;
        Ok(graph)
    }
}

/// Incrementally assembles a `ModelGraph`
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, layer: LayerSpec, inputs: &[NodeId]) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            name: name.into(),
            layer,
            inputs: inputs.to_vec(),
        });
        id
    }

    /// Finish the graph, dropping nodes that do not contribute to `output`
    /// and renumbering the rest.
    pub fn finish(self, input: NodeId, output: NodeId) -> Result<ModelGraph> {
        if output.0 >= self.nodes.len() || input.0 >= self.nodes.len() {
            return Err(NntcError::Graph("Input or output node out of range".to_string()));
        }

        let mut live = vec![false; self.nodes.len()];
        live[output.0] = true;
        live[input.0] = true;
        for idx in (0..self.nodes.len()).rev() {
            if live[idx] {
                for i in &self.nodes[idx].inputs {
                    if i.0 < live.len() {
                        live[i.0] = true;
                    }
                }
            }
        }

        let dropped = live.iter().filter(|l| !**l).count();
        if dropped > 0 {
            log::debug!("Pruned {} node(s) not feeding the graph output", dropped);
        }

        let mut remap: HashMap<NodeId, NodeId> = HashMap::new();
        let mut nodes = Vec::with_capacity(self.nodes.len() - dropped);
        for node in self.nodes.into_iter().filter(|n| live.get(n.id.0).copied().unwrap_or(false)) {
            let new_id = NodeId(nodes.len());
            remap.insert(node.id, new_id);
            let inputs = node
                .inputs
                .iter()
                .map(|i| {
                    remap.get(i).copied().ok_or_else(|| {
                        NntcError::Graph(format!("Node '{}' consumes a later node", node.name))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            nodes.push(Node {
                id: new_id,
                name: node.name,
                layer: node.layer,
                inputs,
            });
        }

        let graph = ModelGraph {
            nodes,
            input: remap[&input],
            output: remap[&output],
        };
        graph.validate()?;
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_graph() -> GraphBuilder {
        let mut g = GraphBuilder::new();
        let x = g.add("input", LayerSpec::Input { seq_len: 8, features: 2 }, &[]);
        let conv = g.add(
            "conv",
            LayerSpec::Conv1D {
                filters: 4,
                kernel_size: 2,
                dilation: 2,
                padding: Padding::Causal,
                activation: Activation::Linear,
            },
            &[x],
        );
        g.add("dense", LayerSpec::Dense { units: 3, activation: Activation::Softmax }, &[conv]);
        g
    }

    #[test]
    fn test_shape_inference() {
        let graph = tiny_graph().finish(NodeId(0), NodeId(2)).unwrap();
        assert_eq!(graph.input_shape().unwrap(), (8, 2));
        assert_eq!(graph.output_shape().unwrap(), (8, 3));
        // conv: 2*2*4 + 4, dense: 4*3 + 3
        assert_eq!(graph.param_count().unwrap(), 20 + 15);
        assert_eq!(graph.receptive_field().unwrap(), 3);
    }

    #[test]
    fn test_finish_prunes_dead_branches() {
        let mut g = tiny_graph();
        g.add("dangling", LayerSpec::BatchNorm { epsilon: 1e-3 }, &[NodeId(1)]);
        let graph = g.finish(NodeId(0), NodeId(2)).unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.count_layers("BatchNorm"), 0);
    }

    #[test]
    fn test_summary_shows_activations() {
        let graph = tiny_graph().finish(NodeId(0), NodeId(2)).unwrap();
        let summary = graph.summary().unwrap();
        assert!(summary.contains("Dense(softmax)"));
        assert!(summary.contains("Conv1D "));
        assert!(!summary.contains("Conv1D(linear)"));
        assert!(summary.contains("Total params: 35"));
    }

    #[test]
    fn test_add_rejects_mismatched_shapes() {
        let mut g = tiny_graph();
        g.add("bad_add", LayerSpec::Add, &[NodeId(0), NodeId(1)]);
        assert!(g.finish(NodeId(0), NodeId(3)).is_err());
    }

    #[test]
    fn test_json_round_trip_validates() {
        let graph = tiny_graph().finish(NodeId(0), NodeId(2)).unwrap();
        let json = graph.to_json().unwrap();
        assert!(json.contains("\"type\": \"conv1d\""));
        assert_eq!(ModelGraph::from_json(&json).unwrap(), graph);
    }
}
