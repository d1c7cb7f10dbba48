//! Energy bookkeeping and the birth/death transitions of cells and eggs.

use crate::brain::{BrainLogic, GenomeLogic};
use crate::config::{AppConfig, MetabolismConfig};
use crate::random::{gaussian, random_angle};
use protocell_data::{
    Brain, Cell, Egg, Food, FoodKind, Genome, Intents, Sensor, Stomach, Vec2,
};
use rand::Rng;

/// Outcome of one digestion step, split by stomach compartment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Digestion {
    pub plant_digestion: f32,
    pub plant_energy: f32,
    pub plant_waste: f32,
    pub meat_digestion: f32,
    pub meat_energy: f32,
    pub meat_waste: f32,
}

#[must_use]
pub fn is_dead(cell: &Cell) -> bool {
    cell.health <= 0.0
}

#[must_use]
pub fn is_alive(cell: &Cell) -> bool {
    cell.health > 0.0
}

/// Spends `amount` of energy into waste.
///
/// Spending more than is stored empties the reserve and converts the
/// shortfall into health damage scaled by `energy_debt_damage`.
pub fn use_energy(cell: &mut Cell, amount: f32, metabolism: &MetabolismConfig) {
    if amount > cell.energy {
        let debt = amount - cell.energy;
        cell.health = (cell.health - debt * metabolism.energy_debt_damage).max(0.0);
        cell.waste += cell.energy;
        cell.energy = 0.0;
        return;
    }
    cell.energy -= amount;
    cell.waste += amount;
}

/// Removes `amount` of energy without producing waste; the reserve never
/// drops below zero.
pub fn take_energy(cell: &mut Cell, amount: f32) -> f32 {
    cell.energy = (cell.energy - amount).max(0.0);
    amount
}

/// Burns any energy held above the genome's capacity.
pub fn spend_surplus(cell: &mut Cell, metabolism: &MetabolismConfig) {
    let max_energy = cell.genome.max_energy(metabolism);
    if cell.energy > max_energy {
        use_energy(cell, cell.energy - max_energy, metabolism);
    }
}

/// Moves a metabolism-sized share of the stomach into energy and waste.
pub fn digest(cell: &mut Cell, metabolism: &MetabolismConfig) -> Digestion {
    let rate = cell.genome.metabolism;
    let diet = cell.genome.diet;

    let plant_digestion = (cell.stomach.plant_calories * rate).min(cell.stomach.plant_calories);
    cell.stomach.plant_calories -= plant_digestion;
    let meat_digestion = (cell.stomach.meat_calories * rate).min(cell.stomach.meat_calories);
    cell.stomach.meat_calories -= meat_digestion;

    let plant_energy = plant_digestion * metabolism.plant_efficiency * (1.0 - diet);
    let meat_energy = meat_digestion * metabolism.meat_efficiency * diet;
    let digestion = Digestion {
        plant_digestion,
        plant_energy,
        plant_waste: plant_digestion - plant_energy,
        meat_digestion,
        meat_energy,
        meat_waste: meat_digestion - meat_energy,
    };

    cell.energy += digestion.plant_energy + digestion.meat_energy;
    cell.waste += digestion.plant_waste + digestion.meat_waste;
    spend_surplus(cell, metabolism);
    digestion
}

/// Adds the food's calories to the matching stomach compartment.
pub fn consume(cell: &mut Cell, food: &mut Food) {
    let calories = food.take_calories();
    match food.kind {
        FoodKind::Plant => cell.stomach.plant_calories += calories,
        FoodKind::Meat => cell.stomach.meat_calories += calories,
    }
    food.consumed = true;
}

/// Damage one stab from `attacker` deals; grows with body area and meat diet.
#[must_use]
pub fn stab_damage(attacker: &Cell, combat_damage: f32) -> f32 {
    attacker.radius * attacker.radius * attacker.genome.diet.powi(3) * combat_damage
}

/// Takes `damage` off `target`'s health, flooring at zero.
pub fn stab(target: &mut Cell, damage: f32) {
    target.health = (target.health - damage).max(0.0);
}

/// Position at `magnitude` along the cell heading rotated by `angle`.
#[must_use]
pub fn polar_offset(cell: &Cell, magnitude: f32, angle: f32) -> Vec2 {
    let combined = cell.angle + angle;
    Vec2::new(
        cell.position.x + combined.cos() * magnitude,
        cell.position.y + combined.sin() * magnitude,
    )
}

#[must_use]
pub fn new_egg(id: u64, genome: Option<Genome>, energy: f32, position: Vec2, radius: f32) -> Egg {
    Egg {
        id,
        position,
        radius,
        age: 0,
        energy,
        hatched: false,
        genome,
    }
}

/// Lays an egg carrying a mutated copy of the parent's genome.
///
/// Returns `None` and leaves the parent untouched when its energy is below
/// the laying cost plus the transferred amount.
pub fn lay_egg_with_rng<R: Rng>(
    cell: &mut Cell,
    id: u64,
    config: &AppConfig,
    rng: &mut R,
) -> Option<Egg> {
    let transfer = cell.genome.egg_energy_transfer;
    if cell.energy < config.metabolism.lay_egg_cost + transfer {
        return None;
    }
    use_energy(cell, config.metabolism.lay_egg_cost, &config.metabolism);
    let energy = take_energy(cell, transfer);
    let genome = cell.genome.mutate_with_rng(&config.genome, rng);
    Some(new_egg(
        id,
        Some(genome),
        energy,
        cell.position,
        config.metabolism.egg_radius,
    ))
}

#[must_use]
pub fn should_excrete(cell: &Cell, metabolism: &MetabolismConfig) -> bool {
    cell.waste > metabolism.excretion_threshold
}

/// Empties the cell's waste into a plant dropped near it.
pub fn excrete_with_rng<R: Rng>(
    cell: &mut Cell,
    id: u64,
    metabolism: &MetabolismConfig,
    rng: &mut R,
) -> Food {
    let waste = std::mem::take(&mut cell.waste);
    let distance = gaussian(
        rng,
        metabolism.excretion_offset_mean,
        metabolism.excretion_offset_std_dev,
    );
    let position = polar_offset(cell, distance, random_angle(rng));
    Food::new(id, FoodKind::Plant, waste, position)
}

/// Turns a dead cell's remaining mass into meat one radius away.
///
/// Returns `None` when nothing is left to drop.
pub fn remains_with_rng<R: Rng>(cell: &mut Cell, id: u64, rng: &mut R) -> Option<Food> {
    let calories = std::mem::take(&mut cell.waste)
        + std::mem::take(&mut cell.energy)
        + std::mem::take(&mut cell.stomach).total()
        + std::mem::take(&mut cell.base_energy);
    if calories <= 0.0 {
        return None;
    }
    let position = polar_offset(cell, cell.radius, random_angle(rng));
    Some(Food::new(id, FoodKind::Meat, calories, position))
}

#[must_use]
pub fn ready_to_hatch(egg: &Egg, metabolism: &MetabolismConfig) -> bool {
    egg.age >= metabolism.hatch_age && !egg.hatched
}

/// Hatches `egg` into a new cell, moving its genome out.
///
/// A generation-0 egg without a genome receives a freshly sampled one.
pub fn hatch_with_rng<R: Rng>(egg: &mut Egg, id: u64, config: &AppConfig, rng: &mut R) -> Cell {
    egg.hatched = true;
    let genome = egg.genome.take().unwrap_or_else(|| {
        Genome::random_with_rng(&config.genome, &config.brain.topology(), rng)
    });
    let brain = Brain::from_genome(&genome, config.brain.activations);
    let energy = (std::mem::take(&mut egg.energy) - config.metabolism.base_energy).max(0.0);

    let mut cell = Cell {
        id,
        position: egg.position,
        velocity: Vec2::default(),
        angle: random_angle(rng),
        radius: genome.radius,
        age: 0,
        health: genome.max_health(&config.metabolism),
        energy,
        base_energy: config.metabolism.base_energy,
        waste: 0.0,
        memory: [0.0; 3],
        intents: Intents::default(),
        sensor: Sensor::default(),
        stomach: Stomach::default(),
        genome,
        brain,
    };
    crate::systems::action::wrap_position(&mut cell.position, &config.world);
    cell
}
