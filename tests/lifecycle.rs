mod common;

use common::{CellBuilder, WorldBuilder};
use protocell_core::config::AppConfig;
use protocell_core::lifecycle;
use protocell_core::GenomeLogic;
use protocell_data::FoodKind;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn test_energy_debt_converts_to_health_damage() {
    let config = AppConfig::default();
    let mut cell = CellBuilder::new().radius(5.0).energy(0.02).build(&config);
    let health = cell.health;
    let prior = cell.energy;

    lifecycle::use_energy(&mut cell, 0.05, &config.metabolism);

    assert_eq!(cell.energy, 0.0);
    assert_close!(health - cell.health, (0.05 - prior) * 100.0, 1e-4);
}

#[test]
fn test_energy_debt_floors_health_at_zero() {
    let config = AppConfig::default();
    let mut cell = CellBuilder::new().energy(1.0).build(&config);

    lifecycle::use_energy(&mut cell, 1_000.0, &config.metabolism);

    assert_eq!(cell.energy, 0.0);
    assert_eq!(cell.health, 0.0);
    assert!(lifecycle::is_dead(&cell));
}

#[test]
fn test_digestion_splits_each_compartment_exactly() {
    let config = AppConfig::default();
    let mut cell = CellBuilder::new().energy(0.0).build(&config);
    cell.genome.metabolism = 0.25;
    cell.stomach.plant_calories = 40.0;
    cell.stomach.meat_calories = 12.0;

    let digestion = lifecycle::digest(&mut cell, &config.metabolism);

    assert_eq!(digestion.plant_energy + digestion.plant_waste, digestion.plant_digestion);
    assert_eq!(digestion.meat_energy + digestion.meat_waste, digestion.meat_digestion);
    assert_eq!(digestion.plant_digestion, 10.0);
    assert_eq!(digestion.meat_digestion, 3.0);
    assert_eq!(cell.stomach.plant_calories, 30.0);
}

#[test]
fn test_poor_cell_cannot_lay() {
    let config = AppConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut cell = CellBuilder::new().energy(10.0).build(&config);
    let needed = config.metabolism.lay_egg_cost + cell.genome.egg_energy_transfer;
    assert!(cell.energy < needed);

    assert!(lifecycle::lay_egg_with_rng(&mut cell, 99, &config, &mut rng).is_none());
    assert_eq!(cell.energy, 10.0);
}

#[test]
fn test_laid_egg_hatches_into_mutated_child() {
    let config = AppConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let mut parent = CellBuilder::new().energy(60.0).build(&config);
    let transfer = parent.genome.egg_energy_transfer;

    let mut egg = lifecycle::lay_egg_with_rng(&mut parent, 10, &config, &mut rng)
        .expect("parent can afford an egg");
    assert_close!(parent.energy, 60.0 - config.metabolism.lay_egg_cost - transfer, 1e-4);
    assert_eq!(egg.energy, transfer);
    assert_eq!(egg.position, parent.position);

    let genome = egg.genome.clone().expect("laid eggs carry a genome");
    assert_ne!(genome, parent.genome);
    assert!(genome.out_of_range_trait(&config.genome).is_none());

    egg.age = config.metabolism.hatch_age;
    assert!(lifecycle::ready_to_hatch(&egg, &config.metabolism));
    let child = lifecycle::hatch_with_rng(&mut egg, 11, &config, &mut rng);
    assert!(egg.hatched);
    assert!(egg.genome.is_none());
    assert_eq!(child.genome, genome);
    assert_eq!(child.energy, transfer - config.metabolism.base_energy);
    assert_eq!(child.health, genome.max_health(&config.metabolism));
}

#[test]
fn test_eggs_hatch_after_incubation() {
    let mut sim = WorldBuilder::new()
        .with_config(|c| c.metabolism.hatch_age = 3)
        .with_egg(0.0, 0.0, 40.0)
        .with_egg(10.0, 10.0, 40.0)
        .build();

    for _ in 0..2 {
        let report = sim.produce();
        assert_eq!(report.hatched, 0);
    }
    let report = sim.produce();
    assert_eq!(report.hatched, 2);
    assert_eq!(sim.cells.len(), 2);

    let cleared = sim.clear();
    assert_eq!(cleared.hatched_eggs_removed, 2);
    assert!(sim.eggs.is_empty());
}

#[test]
fn test_dead_cell_becomes_meat_holding_its_mass() {
    let mut sim = WorldBuilder::new()
        .with_cell(CellBuilder::new().at(0.0, 0.0).energy(20.0))
        .with_cell(CellBuilder::new().at(100.0, 0.0).energy(20.0).seed(2))
        .build();
    let victim = sim.cells[0].id;
    let survivor = sim.cells[1].id;
    sim.cells[0].health = 0.0;
    sim.cells[0].waste = 3.0;
    sim.cells[0].stomach.meat_calories = 2.0;
    let mass = 20.0 + 3.0 + 2.0 + sim.cells[0].base_energy;

    let report = sim.clear();

    assert_eq!(report.deaths, 1);
    assert_cell_gone!(sim, victim);
    assert_cell_alive!(sim, survivor);
    let meat: Vec<_> = sim.foods.iter().filter(|f| f.kind == FoodKind::Meat).collect();
    assert_eq!(meat.len(), 1);
    assert_close!(meat[0].calories, mass, 1e-4);
}

#[test]
fn test_waste_is_excreted_as_plant() {
    let mut sim = WorldBuilder::new()
        .with_cell(CellBuilder::new().at(0.0, 0.0))
        .build();
    let threshold = sim.config().metabolism.excretion_threshold;
    sim.cells[0].waste = threshold + 5.0;

    let report = sim.produce();

    assert_eq!(report.excretions, 1);
    assert_eq!(sim.cells[0].waste, 0.0);
    assert_eq!(sim.foods.len(), 1);
    assert_eq!(sim.foods[0].kind, FoodKind::Plant);
    assert_eq!(sim.foods[0].calories, threshold + 5.0);
}
