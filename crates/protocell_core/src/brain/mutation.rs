use super::*;
use crate::config::TraitGene;
use crate::random::gaussian;

/// Returns a child genome with every gene independently perturbed.
///
/// Scalar traits receive `N(0, σ × multiplier)` noise and are clamped back
/// into range. Weights and biases are perturbed the same way but unclamped.
pub fn mutate_with_rng<R: Rng>(parent: &Genome, config: &GenomeConfig, rng: &mut R) -> Genome {
    let multiplier = config.mutation_multiplier;
    let mut perturb = |gene: &TraitGene, value: f32| {
        gene.clamp(value + gaussian(rng, 0.0, gene.mutation_std_dev * multiplier))
    };

    let radius = perturb(&config.radius, parent.radius);
    let diet = perturb(&config.diet, parent.diet);
    let speed = perturb(&config.speed, parent.speed);
    let vision_range = perturb(&config.vision_range, parent.vision_range);
    let egg_energy_transfer = perturb(&config.egg_energy_transfer, parent.egg_energy_transfer);
    let metabolism = perturb(&config.metabolism, parent.metabolism);
    let red = perturb(&config.color, parent.red);
    let green = perturb(&config.color, parent.green);
    let blue = perturb(&config.color, parent.blue);

    let weight_std = config.weight.mutation_std_dev * multiplier;
    let weights = parent
        .weights
        .iter()
        .map(|w| w + gaussian(rng, 0.0, weight_std))
        .collect();
    let bias_std = config.bias.mutation_std_dev * multiplier;
    let biases = parent
        .biases
        .iter()
        .map(|b| b + gaussian(rng, 0.0, bias_std))
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
        topology: parent.topology.clone(),
        weights,
        biases,
    }
}
