//! World state and the single-threaded lifecycle step run between ticks.

use crate::brain::GenomeLogic;
use crate::config::AppConfig;
use crate::coordinator::{Coordinator, TickReport};
use crate::error::Result;
use crate::lifecycle;
use crate::random::gaussian;
use protocell_data::{Cell, Egg, Food, FoodKind, Genome, Vec2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Births and drops produced by [`Simulation::produce`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProduceReport {
    pub eggs_laid: usize,
    pub excretions: usize,
    pub hatched: usize,
    pub relocated: usize,
}

/// Removals performed by [`Simulation::clear`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub deaths: usize,
    pub hatched_eggs_removed: usize,
    pub food_removed: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub tick: TickReport,
    pub produce: ProduceReport,
    pub clear: ClearReport,
}

/// Population counts and energy totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldStats {
    pub tick: u64,
    pub cells: usize,
    pub eggs: usize,
    pub plants: usize,
    pub meats: usize,
    pub cell_energy: f32,
    pub egg_energy: f32,
    pub food_calories: f32,
}

#[derive(Debug)]
pub struct Simulation {
    pub tick: u64,
    pub cells: Vec<Cell>,
    pub eggs: Vec<Egg>,
    pub foods: Vec<Food>,
    config: Arc<AppConfig>,
    next_id: u64,
    rng: ChaCha8Rng,
}

impl Simulation {
    /// Creates an empty world; call [`Simulation::seed_environment`] to
    /// populate it.
    #[must_use]
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self::from_parts(config, 0, Vec::new(), Vec::new(), Vec::new())
    }

    /// Rebuilds a world from loaded collections.
    ///
    /// Id allocation resumes above the largest id present.
    #[must_use]
    pub fn from_parts(
        config: Arc<AppConfig>,
        tick: u64,
        cells: Vec<Cell>,
        eggs: Vec<Egg>,
        foods: Vec<Food>,
    ) -> Self {
        let rng = match config.world.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let max_id = cells
            .iter()
            .map(|c| c.id)
            .chain(eggs.iter().map(|e| e.id))
            .chain(foods.iter().map(|f| f.id))
            .max()
            .unwrap_or(0);
        Self {
            tick,
            cells,
            eggs,
            foods,
            config,
            next_id: max_id + 1,
            rng,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn shared_config(&self) -> Arc<AppConfig> {
        Arc::clone(&self.config)
    }

    /// Allocates the next entity id; ids are shared by cells, eggs and food.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Scatters plants and generation-0 eggs over four quadrants.
    pub fn seed_environment(&mut self) {
        let world = self.config.world.clone();
        let topology = self.config.brain.topology();
        let quadrants = [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)];

        for (quadrant, (sign_x, sign_y)) in quadrants.into_iter().enumerate() {
            let calories = if quadrant == 0 {
                world.first_quadrant_plant_calories
            } else {
                world.plant_calories
            };
            for _ in 0..world.plants_per_quadrant {
                let position = self.quadrant_position(sign_x, sign_y);
                let id = self.next_id();
                self.foods
                    .push(Food::new(id, FoodKind::Plant, calories, position));
            }
            for _ in 0..world.eggs_per_quadrant {
                let position = self.quadrant_position(sign_x, sign_y);
                let genome = Genome::random_with_rng(&self.config.genome, &topology, &mut self.rng);
                let id = self.next_id();
                self.eggs.push(lifecycle::new_egg(
                    id,
                    Some(genome),
                    world.seed_egg_energy,
                    position,
                    self.config.metabolism.egg_radius,
                ));
            }
        }
        tracing::info!(
            plants = self.foods.len(),
            eggs = self.eggs.len(),
            "Environment seeded"
        );
    }

    fn quadrant_position(&mut self, sign_x: f32, sign_y: f32) -> Vec2 {
        let world = &self.config.world;
        let x = gaussian(&mut self.rng, world.quadrant_distance, world.quadrant_spread);
        let y = gaussian(&mut self.rng, world.quadrant_distance, world.quadrant_spread);
        Vec2::new(sign_x * x, sign_y * y)
    }

    /// Runs one coordinated tick followed by the lifecycle step.
    pub fn step(&mut self, coordinator: &mut Coordinator) -> Result<StepReport> {
        let tick = coordinator.run_tick(&mut self.cells, &mut self.foods)?;
        let produce = self.produce();
        let clear = self.clear();
        self.tick += 1;
        Ok(StepReport {
            tick,
            produce,
            clear,
        })
    }

    /// Egg laying, excretion, egg ageing/hatching and far-food relocation.
    pub fn produce(&mut self) -> ProduceReport {
        let mut report = ProduceReport::default();
        let config = Arc::clone(&self.config);

        let mut cells = std::mem::take(&mut self.cells);
        for cell in cells.iter_mut().filter(|c| lifecycle::is_alive(c)) {
            if cell.intents.lay_egg {
                let id = self.next_id;
                if let Some(egg) = lifecycle::lay_egg_with_rng(cell, id, &config, &mut self.rng) {
                    self.next_id += 1;
                    self.eggs.push(egg);
                    report.eggs_laid += 1;
                }
            }
            if lifecycle::should_excrete(cell, &config.metabolism) {
                let id = self.next_id();
                let plant = lifecycle::excrete_with_rng(cell, id, &config.metabolism, &mut self.rng);
                self.foods.push(plant);
                report.excretions += 1;
            }
        }

        for egg in &mut self.eggs {
            egg.age += 1;
        }
        let mut eggs = std::mem::take(&mut self.eggs);
        for egg in eggs
            .iter_mut()
            .filter(|e| lifecycle::ready_to_hatch(e, &config.metabolism))
        {
            let id = self.next_id();
            cells.push(lifecycle::hatch_with_rng(egg, id, &config, &mut self.rng));
            report.hatched += 1;
        }
        self.eggs = eggs;
        self.cells = cells;

        report.relocated = self.relocate_far_food();
        report
    }

    /// Moves food that drifted beyond the allowed radius back near the origin.
    pub fn relocate_far_food(&mut self) -> usize {
        let limit = self.config.world.food_max_distance();
        let spread = self.config.world.food_spread;
        let mut relocated = 0;
        for food in &mut self.foods {
            if food.position.length() > limit {
                food.position = Vec2::new(
                    gaussian(&mut self.rng, 0.0, spread),
                    gaussian(&mut self.rng, 0.0, spread),
                );
                relocated += 1;
            }
        }
        relocated
    }

    /// Turns dead cells into meat and compacts all collections.
    pub fn clear(&mut self) -> ClearReport {
        let mut report = ClearReport::default();

        let mut remains = Vec::new();
        for cell in self.cells.iter_mut().filter(|c| lifecycle::is_dead(c)) {
            report.deaths += 1;
            let id = self.next_id;
            if let Some(meat) = lifecycle::remains_with_rng(cell, id, &mut self.rng) {
                self.next_id += 1;
                remains.push(meat);
            }
        }
        self.foods.extend(remains);

        self.cells.retain(lifecycle::is_alive);

        let eggs_before = self.eggs.len();
        self.eggs.retain(|e| !e.hatched);
        report.hatched_eggs_removed = eggs_before - self.eggs.len();

        let foods_before = self.foods.len();
        self.foods.retain(|f| !f.consumed);
        report.food_removed = foods_before - self.foods.len();

        report
    }

    #[must_use]
    pub fn stats(&self) -> WorldStats {
        let (plants, meats) = self.foods.iter().fold((0, 0), |(p, m), f| match f.kind {
            FoodKind::Plant => (p + 1, m),
            FoodKind::Meat => (p, m + 1),
        });
        WorldStats {
            tick: self.tick,
            cells: self.cells.len(),
            eggs: self.eggs.len(),
            plants,
            meats,
            cell_energy: self.cells.iter().map(|c| c.energy).sum(),
            egg_energy: self.eggs.iter().map(|e| e.energy).sum(),
            food_calories: self.foods.iter().map(|f| f.calories).sum(),
        }
    }
}
