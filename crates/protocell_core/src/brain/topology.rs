use super::*;
use crate::random::gaussian;

/// Samples a generation-0 genome for `topology`.
///
/// Every trait is drawn from its configured normal distribution and clamped;
/// network parameters are left unclamped.
pub fn create_genome_random_with_rng<R: Rng>(
    config: &GenomeConfig,
    topology: &Topology,
    rng: &mut R,
) -> Genome {
    let mut sample =
        |gene: &crate::config::TraitGene| gene.clamp(gaussian(rng, gene.mean, gene.std_dev));

    let radius = sample(&config.radius);
    let diet = sample(&config.diet);
    let speed = sample(&config.speed);
    let vision_range = sample(&config.vision_range);
    let egg_energy_transfer = sample(&config.egg_energy_transfer);
    let metabolism = sample(&config.metabolism);
    let red = sample(&config.color);
    let green = sample(&config.color);
    let blue = sample(&config.color);

    let weights = (0..topology.weight_count())
        .map(|_| gaussian(rng, 0.0, config.weight.std_dev))
        .collect();
    let biases = (0..topology.neuron_count())
        .map(|_| gaussian(rng, 0.0, config.bias.std_dev))
        .collect();

    Genome {
        radius,
        diet,
        speed,
        vision_range,
        egg_energy_transfer,
        metabolism,
        red,
        green,
        blue,
        topology: topology.clone(),
        weights,
        biases,
    }
}

/// Builds a fresh network whose parameters are copied from `genome`.
pub fn create_brain_from_genome(genome: &Genome, activations: LayerActivations) -> Brain {
    Brain {
        topology: genome.topology.clone(),
        activations,
        values: vec![0.0; genome.topology.neuron_count()],
        weights: genome.weights.clone(),
        biases: genome.biases.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_genome_sizes() {
        let config = AppConfig::default();
        let topology = config.brain.topology();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let genome = create_genome_random_with_rng(&config.genome, &topology, &mut rng);
        assert_eq!(genome.weights.len(), topology.weight_count());
        assert_eq!(genome.biases.len(), topology.neuron_count());
        assert_eq!(genome.out_of_range_trait(&config.genome), None);
    }

    #[test]
    fn test_random_genome_reproducible() {
        let config = AppConfig::default();
        let topology = config.brain.topology();
        let mut a = ChaCha8Rng::seed_from_u64(21);
        let mut b = ChaCha8Rng::seed_from_u64(21);
        assert_eq!(
            create_genome_random_with_rng(&config.genome, &topology, &mut a),
            create_genome_random_with_rng(&config.genome, &topology, &mut b)
        );
    }

    #[test]
    fn test_brain_copies_parameters() {
        let config = AppConfig::default();
        let topology = config.brain.topology();
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let genome = create_genome_random_with_rng(&config.genome, &topology, &mut rng);
        let brain = create_brain_from_genome(&genome, config.brain.activations);
        assert_eq!(brain.weights, genome.weights);
        assert_eq!(brain.biases, genome.biases);
        assert!(brain.values.iter().all(|v| *v == 0.0));
    }
}
