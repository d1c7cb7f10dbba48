use super::genome::Topology;
use serde::{Deserialize, Serialize};

/// Per-layer activation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Identity,
    Relu,
    LeakyRelu,
    Sigmoid,
    Tanh,
    SquareRoot,
}

/// Activation used by the input, hidden and output layers respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerActivations {
    pub input: Activation,
    pub hidden: Activation,
    pub output: Activation,
}

impl Default for LayerActivations {
    fn default() -> Self {
        Self {
            input: Activation::Identity,
            hidden: Activation::LeakyRelu,
            output: Activation::Sigmoid,
        }
    }
}

/// The network instance a cell evaluates every tick.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Brain {
    pub topology: Topology,
    pub activations: LayerActivations,
    /// Flat activation buffer, one slot per neuron.
    pub values: Vec<f32>,
    pub weights: Vec<f32>,
    pub biases: Vec<f32>,
}
