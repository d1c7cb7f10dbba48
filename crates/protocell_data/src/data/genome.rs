use serde::{Deserialize, Serialize};

/// Layer sizes of a feed-forward network, input layer first.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Topology {
    pub layers: Vec<usize>,
}

impl Topology {
    #[must_use]
    pub fn new(input_count: usize, hidden: &[usize], output_count: usize) -> Self {
        let mut layers = Vec::with_capacity(hidden.len() + 2);
        layers.push(input_count);
        layers.extend_from_slice(hidden);
        layers.push(output_count);
        Self { layers }
    }

    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn layer_size(&self, layer: usize) -> usize {
        self.layers[layer]
    }

    #[must_use]
    pub fn input_count(&self) -> usize {
        self.layers.first().copied().unwrap_or(0)
    }

    #[must_use]
    pub fn output_count(&self) -> usize {
        self.layers.last().copied().unwrap_or(0)
    }

    /// Total neurons across all layers; one bias per neuron.
    #[must_use]
    pub fn neuron_count(&self) -> usize {
        self.layers.iter().sum()
    }

    /// Dense weights between consecutive layers.
    #[must_use]
    pub fn weight_count(&self) -> usize {
        self.layers.windows(2).map(|w| w[0] * w[1]).sum()
    }

    /// Offset of the first neuron of `layer` in the flat activation buffer.
    #[must_use]
    pub fn layer_start(&self, layer: usize) -> usize {
        self.layers[..layer].iter().sum()
    }

    /// Offset of the first weight feeding into `layer` (layer >= 1).
    #[must_use]
    pub fn weight_start(&self, layer: usize) -> usize {
        self.layers[..layer].windows(2).map(|w| w[0] * w[1]).sum()
    }
}

/// Heritable parameter set of a cell: body traits plus network parameters.
///
/// Weights are laid out layer by layer; within a layer, neuron-major then
/// input index, matching [`Topology::weight_start`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Genome {
    pub radius: f32,
    /// 0 = plants only, 1 = meat only.
    pub diet: f32,
    pub speed: f32,
    pub vision_range: f32,
    pub egg_energy_transfer: f32,
    pub metabolism: f32,
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub topology: Topology,
    pub weights: Vec<f32>,
    pub biases: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_topology_counts() {
        let topology = Topology::new(7, &[15, 15], 12);
        assert_eq!(topology.layer_count(), 4);
        assert_eq!(topology.neuron_count(), 7 + 15 + 15 + 12);
        assert_eq!(topology.weight_count(), 7 * 15 + 15 * 15 + 15 * 12);
        assert_eq!(topology.layer_start(3), 37);
        assert_eq!(topology.weight_start(1), 0);
        assert_eq!(topology.weight_start(2), 105);
        assert_eq!(topology.weight_start(3), 330);
    }

    #[test]
    fn test_topology_without_hidden_layers() {
        let topology = Topology::new(3, &[], 2);
        assert_eq!(topology.weight_count(), 6);
        assert_eq!(topology.input_count(), 3);
        assert_eq!(topology.output_count(), 2);
    }
}
