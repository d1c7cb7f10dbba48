pub mod forward;
pub mod mutation;
pub mod topology;

use crate::config::{GenomeConfig, MetabolismConfig};
pub use protocell_data::{Activation, Brain, Genome, LayerActivations, Rgb, Topology};
use rand::Rng;

pub use topology::{create_brain_from_genome, create_genome_random_with_rng};

/// Runtime behaviour of a cell's feed-forward network.
pub trait BrainLogic {
    fn from_genome(genome: &Genome, activations: LayerActivations) -> Self;

    /// Zeroes every neuron value.
    fn reset(&mut self);
    fn set_input(&mut self, index: usize, value: f32);
    fn evaluate(&mut self);

    #[must_use]
    fn output(&self, index: usize) -> f32;

    #[must_use]
    fn outputs(&self) -> &[f32];
}

/// Construction, inheritance and derived quantities of a genome.
pub trait GenomeLogic {
    fn random_with_rng<R: Rng>(config: &GenomeConfig, topology: &Topology, rng: &mut R) -> Self;

    #[must_use]
    fn mutate_with_rng<R: Rng>(&self, config: &GenomeConfig, rng: &mut R) -> Self;

    fn max_health(&self, metabolism: &MetabolismConfig) -> f32;
    fn max_energy(&self, metabolism: &MetabolismConfig) -> f32;
    fn color(&self) -> Rgb;

    /// Name of the first trait outside its configured range, if any.
    fn out_of_range_trait(&self, config: &GenomeConfig) -> Option<&'static str>;
}

pub const INPUT_LABELS: [&str; 7] = [
    "Sensor", "Red", "Green", "Blue", "Memory 1", "Memory 2", "Memory 3",
];

pub const OUTPUT_LABELS: [&str; 12] = [
    "Forward",
    "Backward",
    "Strafe Right",
    "Strafe Left",
    "+Angle",
    "-Angle",
    "Memory 1",
    "Memory 2",
    "Memory 3",
    "Eat",
    "Lay Egg",
    "Stab",
];

pub const BRAIN_INPUTS: usize = INPUT_LABELS.len();
pub const BRAIN_OUTPUTS: usize = OUTPUT_LABELS.len();
pub const BRAIN_MEMORY: usize = 3;

pub const INPUT_SENSOR: usize = 0;
pub const INPUT_COLOR: usize = 1;
pub const INPUT_MEMORY: usize = 4;

pub const OUTPUT_FORWARD: usize = 0;
pub const OUTPUT_BACKWARD: usize = 1;
pub const OUTPUT_STRAFE_RIGHT: usize = 2;
pub const OUTPUT_STRAFE_LEFT: usize = 3;
pub const OUTPUT_TURN_POSITIVE: usize = 4;
pub const OUTPUT_TURN_NEGATIVE: usize = 5;
pub const OUTPUT_MEMORY: usize = 6;
pub const OUTPUT_EAT: usize = 9;
pub const OUTPUT_LAY_EGG: usize = 10;
pub const OUTPUT_STAB: usize = 11;

impl BrainLogic for Brain {
    fn from_genome(genome: &Genome, activations: LayerActivations) -> Self {
        topology::create_brain_from_genome(genome, activations)
    }

    fn reset(&mut self) {
        self.values.iter_mut().for_each(|v| *v = 0.0);
    }

    fn set_input(&mut self, index: usize, value: f32) {
        if index < self.topology.input_count() {
            self.values[index] = value;
        }
    }

    fn evaluate(&mut self) {
        forward::evaluate(self);
    }

    fn output(&self, index: usize) -> f32 {
        self.outputs().get(index).copied().unwrap_or(0.0)
    }

    fn outputs(&self) -> &[f32] {
        let last = self.topology.layer_count().saturating_sub(1);
        let start = self.topology.layer_start(last).min(self.values.len());
        &self.values[start..]
    }
}

impl GenomeLogic for Genome {
    fn random_with_rng<R: Rng>(config: &GenomeConfig, topology: &Topology, rng: &mut R) -> Self {
        topology::create_genome_random_with_rng(config, topology, rng)
    }

    fn mutate_with_rng<R: Rng>(&self, config: &GenomeConfig, rng: &mut R) -> Self {
        mutation::mutate_with_rng(self, config, rng)
    }

    fn max_health(&self, metabolism: &MetabolismConfig) -> f32 {
        self.radius * self.radius * metabolism.max_health_per_area
    }

    fn max_energy(&self, metabolism: &MetabolismConfig) -> f32 {
        self.radius * self.radius * metabolism.max_energy_per_area
    }

    fn color(&self) -> Rgb {
        Rgb::new(self.red, self.green, self.blue)
    }

    fn out_of_range_trait(&self, config: &GenomeConfig) -> Option<&'static str> {
        let values = [
            self.radius,
            self.diet,
            self.speed,
            self.vision_range,
            self.egg_energy_transfer,
            self.metabolism,
        ];
        for ((name, gene), value) in config.traits().into_iter().zip(values) {
            if !gene.contains(value) {
                return Some(name);
            }
        }
        [("red", self.red), ("green", self.green), ("blue", self.blue)]
            .into_iter()
            .find(|(_, value)| !config.color.contains(*value))
            .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_label_counts_match_topology() {
        let topology = AppConfig::default().brain.topology();
        assert_eq!(topology.input_count(), BRAIN_INPUTS);
        assert_eq!(topology.output_count(), BRAIN_OUTPUTS);
        assert_eq!(OUTPUT_MEMORY + BRAIN_MEMORY, OUTPUT_EAT);
    }

    #[test]
    fn test_capacities_scale_with_area() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut genome = Genome::random_with_rng(&config.genome, &config.brain.topology(), &mut rng);
        genome.radius = 3.0;
        assert_eq!(genome.max_health(&config.metabolism), 9.0);
        assert_eq!(genome.max_energy(&config.metabolism), 90.0);
    }

    #[test]
    fn test_out_of_range_detection() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut genome = Genome::random_with_rng(&config.genome, &config.brain.topology(), &mut rng);
        assert_eq!(genome.out_of_range_trait(&config.genome), None);
        genome.green = 250.0;
        assert_eq!(genome.out_of_range_trait(&config.genome), Some("green"));
        genome.diet = 0.9;
        assert_eq!(genome.out_of_range_trait(&config.genome), Some("diet"));
    }

    #[test]
    fn test_outputs_slice_is_last_layer() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let genome = Genome::random_with_rng(&config.genome, &config.brain.topology(), &mut rng);
        let brain = Brain::from_genome(&genome, config.brain.activations);
        assert_eq!(brain.outputs().len(), BRAIN_OUTPUTS);
        assert_eq!(brain.output(BRAIN_OUTPUTS), 0.0);
    }
}
