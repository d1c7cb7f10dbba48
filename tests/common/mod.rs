pub mod macros;

use protocell_core::brain::GenomeLogic;
use protocell_core::config::AppConfig;
use protocell_core::lifecycle;
use protocell_core::Simulation;
use protocell_data::{Cell, Egg, Food, FoodKind, Genome, Vec2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

/// Builds a small world by hand; nothing is seeded unless asked.
#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    cells: Vec<Cell>,
    eggs: Vec<Egg>,
    foods: Vec<Food>,
    next_id: u64,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.seed = Some(7);
        config.world.plants_per_quadrant = 0;
        config.world.eggs_per_quadrant = 0;
        Self {
            config,
            cells: Vec::new(),
            eggs: Vec::new(),
            foods: Vec::new(),
            next_id: 1,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn with_cell(mut self, cell: CellBuilder) -> Self {
        let id = self.allocate();
        let mut cell = cell.build(&self.config);
        cell.id = id;
        self.cells.push(cell);
        self
    }

    pub fn with_egg(mut self, x: f32, y: f32, energy: f32) -> Self {
        let id = self.allocate();
        let mut rng = ChaCha8Rng::seed_from_u64(id);
        let genome =
            Genome::random_with_rng(&self.config.genome, &self.config.brain.topology(), &mut rng);
        self.eggs.push(lifecycle::new_egg(
            id,
            Some(genome),
            energy,
            Vec2::new(x, y),
            self.config.metabolism.egg_radius,
        ));
        self
    }

    pub fn with_food(mut self, kind: FoodKind, calories: f32, x: f32, y: f32) -> Self {
        let id = self.allocate();
        self.foods.push(Food::new(id, kind, calories, Vec2::new(x, y)));
        self
    }

    /// Seeds the four quadrants with the given per-quadrant counts.
    pub fn seeded(self, plants: usize, eggs: usize) -> Simulation {
        let builder = self.with_config(|c| {
            c.world.plants_per_quadrant = plants;
            c.world.eggs_per_quadrant = eggs;
        });
        let mut sim = Simulation::new(Arc::new(builder.config));
        sim.seed_environment();
        sim
    }

    pub fn build(self) -> Simulation {
        Simulation::from_parts(Arc::new(self.config), 0, self.cells, self.eggs, self.foods)
    }
}

/// Describes a freshly hatched cell with selected genome overrides.
#[allow(dead_code)]
pub struct CellBuilder {
    position: Vec2,
    angle: f32,
    energy: f32,
    health: Option<f32>,
    radius: Option<f32>,
    diet: Option<f32>,
    vision_range: Option<f32>,
    color: Option<(f32, f32, f32)>,
    seed: u64,
}

#[allow(dead_code)]
impl CellBuilder {
    pub fn new() -> Self {
        Self {
            position: Vec2::default(),
            angle: 0.0,
            energy: 50.0,
            health: None,
            radius: None,
            diet: None,
            vision_range: None,
            color: None,
            seed: 1,
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn facing(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn energy(mut self, energy: f32) -> Self {
        self.energy = energy;
        self
    }

    pub fn health(mut self, health: f32) -> Self {
        self.health = Some(health);
        self
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn diet(mut self, diet: f32) -> Self {
        self.diet = Some(diet);
        self
    }

    pub fn vision(mut self, range: f32) -> Self {
        self.vision_range = Some(range);
        self
    }

    pub fn color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.color = Some((r, g, b));
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self, config: &AppConfig) -> Cell {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut genome = Genome::random_with_rng(&config.genome, &config.brain.topology(), &mut rng);
        if let Some(radius) = self.radius {
            genome.radius = radius;
        }
        if let Some(diet) = self.diet {
            genome.diet = diet;
        }
        if let Some(range) = self.vision_range {
            genome.vision_range = range;
        }
        if let Some((r, g, b)) = self.color {
            genome.red = r;
            genome.green = g;
            genome.blue = b;
        }

        let mut egg = lifecycle::new_egg(
            0,
            Some(genome),
            config.metabolism.base_energy + self.energy,
            self.position,
            config.metabolism.egg_radius,
        );
        let mut cell = lifecycle::hatch_with_rng(&mut egg, 0, config, &mut rng);
        cell.angle = self.angle;
        if let Some(health) = self.health {
            cell.health = health;
        }
        cell
    }
}
