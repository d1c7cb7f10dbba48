//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file. Every tuning constant of the simulation lives here
//! with its default value.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` file (overrides defaults, missing keys fall back)
//! 3. Command-line flags for a handful of run-level options
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! seed = 42
//! wrap = false
//!
//! [threads]
//! partitions = 3
//!
//! [genome]
//! mutation_multiplier = 5.0
//! ```

use crate::brain::{BRAIN_INPUTS, BRAIN_OUTPUTS};
use protocell_data::{LayerActivations, Topology};
use serde::{Deserialize, Serialize};

/// Sampling and mutation parameters of one scalar genome trait.
///
/// Values are always clamped into `[min, max]` after sampling or mutation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TraitGene {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub std_dev: f32,
    /// Per-generation standard deviation, before `mutation_multiplier`.
    pub mutation_std_dev: f32,
}

impl TraitGene {
    #[must_use]
    pub const fn new(min: f32, max: f32, mean: f32, std_dev: f32, mutation_std_dev: f32) -> Self {
        Self {
            min,
            max,
            mean,
            std_dev,
            mutation_std_dev,
        }
    }

    #[must_use]
    pub fn clamp(&self, value: f32) -> f32 {
        value.max(self.min).min(self.max)
    }

    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Unbounded network parameter distribution.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ParameterGene {
    pub std_dev: f32,
    pub mutation_std_dev: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GenomeConfig {
    pub mutation_multiplier: f32,
    pub radius: TraitGene,
    pub diet: TraitGene,
    pub speed: TraitGene,
    pub vision_range: TraitGene,
    pub egg_energy_transfer: TraitGene,
    pub metabolism: TraitGene,
    pub color: TraitGene,
    pub weight: ParameterGene,
    pub bias: ParameterGene,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        let color_range = (15.0, 235.0);
        Self {
            mutation_multiplier: 5.0,
            radius: TraitGene::new(1.0, 7.0, 2.0, 0.5, 0.005),
            diet: TraitGene::new(0.2, 0.8, 0.5, 0.15, 0.0025),
            speed: TraitGene::new(0.1, 1.0, 0.5, 0.25, 0.001),
            vision_range: TraitGene::new(0.1, 500.0, 100.0, 30.0, 0.0025),
            egg_energy_transfer: TraitGene::new(15.0, 100.0, 17.0, 1.0, 0.0075),
            metabolism: TraitGene::new(0.0, 1.0, 5e-3, 1e-3, 1e-6),
            color: TraitGene::new(
                color_range.0,
                color_range.1,
                (color_range.0 + color_range.1) / 2.0,
                20.0,
                0.08,
            ),
            weight: ParameterGene {
                std_dev: 0.5,
                mutation_std_dev: 0.004,
            },
            bias: ParameterGene {
                std_dev: 0.1,
                mutation_std_dev: 0.002,
            },
        }
    }
}

impl GenomeConfig {
    /// Every bounded trait with its name, in genome field order.
    #[must_use]
    pub fn traits(&self) -> [(&'static str, &TraitGene); 7] {
        [
            ("radius", &self.radius),
            ("diet", &self.diet),
            ("speed", &self.speed),
            ("vision_range", &self.vision_range),
            ("egg_energy_transfer", &self.egg_energy_transfer),
            ("metabolism", &self.metabolism),
            ("color", &self.color),
        ]
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BrainConfig {
    pub hidden_layers: Vec<usize>,
    pub activations: LayerActivations,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            hidden_layers: vec![15, 15],
            activations: LayerActivations::default(),
        }
    }
}

impl BrainConfig {
    /// Resolves the full layer layout; input and output widths are fixed.
    #[must_use]
    pub fn topology(&self) -> Topology {
        Topology::new(BRAIN_INPUTS, &self.hidden_layers, BRAIN_OUTPUTS)
    }
}

/// Conversion of brain outputs into motion.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MotionConfig {
    pub speed_multiplier: f32,
    pub angular_speed_multiplier: f32,
    pub movement_multiplier: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            angular_speed_multiplier: 0.05,
            movement_multiplier: 2.0,
        }
    }
}

/// Energy, digestion and reproduction costs.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MetabolismConfig {
    pub max_health_per_area: f32,
    pub max_energy_per_area: f32,
    pub base_energy: f32,
    pub plant_efficiency: f32,
    pub meat_efficiency: f32,
    pub energy_debt_damage: f32,
    /// Scales every per-tick cost below.
    pub cost_multiplier: f32,
    pub passive_cost: f32,
    pub linear_cost: f32,
    pub angular_cost: f32,
    pub stab_cost: f32,
    pub lay_egg_cost: f32,
    pub excretion_threshold: f32,
    pub excretion_offset_mean: f32,
    pub excretion_offset_std_dev: f32,
    pub hatch_age: u64,
    pub egg_radius: f32,
}

impl Default for MetabolismConfig {
    fn default() -> Self {
        Self {
            max_health_per_area: 1.0,
            max_energy_per_area: 10.0,
            base_energy: 15.0,
            plant_efficiency: 0.75,
            meat_efficiency: 0.99,
            energy_debt_damage: 100.0,
            cost_multiplier: 2.5,
            passive_cost: 2e-4,
            linear_cost: 1e-3,
            angular_cost: 0.0,
            stab_cost: 5e-6,
            lay_egg_cost: 1.0,
            excretion_threshold: 20.0,
            excretion_offset_mean: 50.0,
            excretion_offset_std_dev: 7.5,
            hatch_age: 500,
            egg_radius: 1.0,
        }
    }
}

/// Ray reach, combat and intent thresholds.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct InteractionConfig {
    pub eat_reach: f32,
    pub stab_reach: f32,
    pub combat_damage: f32,
    pub want_eat_threshold: f32,
    pub want_egg_threshold: f32,
    pub want_stab_threshold: f32,
    /// Clamp the sensor strength input into `[0, 1]`.
    pub clamp_sensor_strength: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            eat_reach: 5.0,
            stab_reach: 5.0,
            combat_damage: 0.1,
            want_eat_threshold: 0.40,
            want_egg_threshold: 0.40,
            want_stab_threshold: 0.51,
            clamp_sensor_strength: false,
        }
    }
}

/// World bounds, food drift limits and initial seeding.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: Option<u64>,
    pub map_size: f32,
    pub wrap: bool,
    /// Standard deviation of the origin-centred respawn position of drifting food.
    pub food_spread: f32,
    /// Food farther than `food_spread * food_max_distance_factor` is relocated.
    pub food_max_distance_factor: f32,
    pub plants_per_quadrant: usize,
    pub eggs_per_quadrant: usize,
    pub quadrant_distance: f32,
    pub quadrant_spread: f32,
    pub first_quadrant_plant_calories: f32,
    pub plant_calories: f32,
    pub seed_egg_energy: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            map_size: 10_000.0,
            wrap: false,
            food_spread: 2100.0,
            food_max_distance_factor: 2.5,
            plants_per_quadrant: 200,
            eggs_per_quadrant: 500,
            quadrant_distance: 2000.0,
            quadrant_spread: 1000.0,
            first_quadrant_plant_calories: 40.0,
            plant_calories: 50.0,
            seed_egg_energy: 20.0,
        }
    }
}

impl WorldConfig {
    #[must_use]
    pub fn food_max_distance(&self) -> f32 {
        self.food_spread * self.food_max_distance_factor
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ThreadConfig {
    /// Worker partitions; `None` uses available parallelism minus one.
    pub partitions: Option<usize>,
    pub minimum: usize,
    pub recommended: usize,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            partitions: None,
            minimum: 1,
            recommended: 4,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PersistenceConfig {
    pub saves_dir: String,
    pub autosave: bool,
    pub autosave_period_secs: u64,
    pub save_on_exit: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            saves_dir: "saves".to_string(),
            autosave: true,
            autosave_period_secs: 30 * 60,
            save_on_exit: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub genome: GenomeConfig,
    pub brain: BrainConfig,
    pub motion: MotionConfig,
    pub metabolism: MetabolismConfig,
    pub interaction: InteractionConfig,
    pub threads: ThreadConfig,
    pub persistence: PersistenceConfig,
    /// Ticks between periodic metric log lines.
    pub log_interval: u64,
    /// A tick slower than this is logged as a warning.
    pub warn_tick_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            genome: GenomeConfig::default(),
            brain: BrainConfig::default(),
            motion: MotionConfig::default(),
            metabolism: MetabolismConfig::default(),
            interaction: InteractionConfig::default(),
            threads: ThreadConfig::default(),
            persistence: PersistenceConfig::default(),
            log_interval: 1000,
            warn_tick_ms: 50,
        }
    }
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        // World validation
        anyhow::ensure!(self.world.map_size > 0.0, "Map size must be positive");
        anyhow::ensure!(
            self.world.food_spread >= 0.0,
            "Food spread must be non-negative"
        );
        anyhow::ensure!(
            self.world.food_max_distance_factor > 0.0,
            "Food max distance factor must be positive"
        );
        anyhow::ensure!(
            self.world.quadrant_spread >= 0.0,
            "Quadrant spread must be non-negative"
        );
        anyhow::ensure!(
            self.world.seed_egg_energy >= self.metabolism.base_energy,
            "Seed egg energy must cover the base energy of a hatchling"
        );

        // Genome validation
        anyhow::ensure!(
            self.genome.mutation_multiplier >= 0.0,
            "Mutation multiplier must be non-negative"
        );
        for (name, gene) in self.genome.traits() {
            anyhow::ensure!(gene.min <= gene.max, "Trait {name} has min above max");
            anyhow::ensure!(
                gene.std_dev >= 0.0 && gene.mutation_std_dev >= 0.0,
                "Trait {name} has a negative standard deviation"
            );
        }
        anyhow::ensure!(self.genome.radius.min > 0.0, "Radius minimum must be positive");
        anyhow::ensure!(
            self.genome.vision_range.min > 0.0,
            "Vision range minimum must be positive"
        );
        anyhow::ensure!(
            self.genome.diet.min >= 0.0 && self.genome.diet.max <= 1.0,
            "Diet range must lie within [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.genome.egg_energy_transfer.min >= self.metabolism.base_energy,
            "Egg energy transfer minimum must cover the base energy of a hatchling"
        );
        anyhow::ensure!(
            self.genome.weight.std_dev >= 0.0
                && self.genome.weight.mutation_std_dev >= 0.0
                && self.genome.bias.std_dev >= 0.0
                && self.genome.bias.mutation_std_dev >= 0.0,
            "Network parameter standard deviations must be non-negative"
        );

        // Brain validation
        anyhow::ensure!(
            self.brain.hidden_layers.iter().all(|&size| size > 0),
            "Hidden layers must not be empty"
        );

        // Metabolism validation
        anyhow::ensure!(
            self.metabolism.max_energy_per_area > 0.0 && self.metabolism.max_health_per_area > 0.0,
            "Health and energy capacities must be positive"
        );
        anyhow::ensure!(
            self.metabolism.base_energy >= 0.0,
            "Base energy must be non-negative"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.metabolism.plant_efficiency)
                && (0.0..=1.0).contains(&self.metabolism.meat_efficiency),
            "Digestion efficiencies must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.metabolism.energy_debt_damage >= 0.0,
            "Energy debt damage must be non-negative"
        );
        anyhow::ensure!(
            self.metabolism.cost_multiplier >= 0.0
                && self.metabolism.passive_cost >= 0.0
                && self.metabolism.linear_cost >= 0.0
                && self.metabolism.angular_cost >= 0.0
                && self.metabolism.stab_cost >= 0.0
                && self.metabolism.lay_egg_cost >= 0.0,
            "Energy costs must be non-negative"
        );
        anyhow::ensure!(
            self.metabolism.excretion_threshold >= 0.0,
            "Excretion threshold must be non-negative"
        );
        anyhow::ensure!(
            self.metabolism.excretion_offset_std_dev >= 0.0,
            "Excretion offset deviation must be non-negative"
        );

        // Interaction validation
        anyhow::ensure!(
            self.interaction.eat_reach >= 0.0 && self.interaction.stab_reach >= 0.0,
            "Reach must be non-negative"
        );
        anyhow::ensure!(
            self.interaction.combat_damage >= 0.0,
            "Combat damage must be non-negative"
        );
        for threshold in [
            self.interaction.want_eat_threshold,
            self.interaction.want_egg_threshold,
            self.interaction.want_stab_threshold,
        ] {
            anyhow::ensure!(
                (0.0..=1.0).contains(&threshold),
                "Intent thresholds must be in [0.0, 1.0]"
            );
        }

        // Thread validation
        anyhow::ensure!(self.threads.minimum > 0, "Minimum thread count must be positive");
        anyhow::ensure!(
            self.threads.recommended >= self.threads.minimum,
            "Recommended thread count must not be below the minimum"
        );
        anyhow::ensure!(
            self.threads.partitions != Some(0),
            "Partition count must be positive"
        );

        // Persistence validation
        anyhow::ensure!(
            self.persistence.autosave_period_secs > 0,
            "Autosave period must be positive"
        );
        anyhow::ensure!(
            !self.persistence.saves_dir.is_empty(),
            "Saves directory must not be empty"
        );

        anyhow::ensure!(self.log_interval > 0, "Log interval must be positive");

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Hash over every section that changes simulation behaviour.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.genome).as_bytes());
        hasher.update(format!("{:?}", self.brain).as_bytes());
        hasher.update(format!("{:?}", self.motion).as_bytes());
        hasher.update(format!("{:?}", self.metabolism).as_bytes());
        hasher.update(format!("{:?}", self.interaction).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_trait_range() {
        let mut config = AppConfig::default();
        config.genome.radius = TraitGene::new(5.0, 1.0, 2.0, 0.5, 0.005);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_vision_minimum() {
        let mut config = AppConfig::default();
        config.genome.vision_range.min = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_partitions() {
        let config = AppConfig {
            threads: ThreadConfig {
                partitions: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_recommended_below_minimum() {
        let config = AppConfig {
            threads: ThreadConfig {
                partitions: None,
                minimum: 4,
                recommended: 2,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_threshold() {
        let mut config = AppConfig::default();
        config.interaction.want_stab_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_hidden_layer() {
        let mut config = AppConfig::default();
        config.brain.hidden_layers = vec![15, 0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [world]
            seed = 7

            [threads]
            partitions = 2
            "#,
        )
        .expect("partial config should parse");
        assert_eq!(config.world.seed, Some(7));
        assert_eq!(config.threads.partitions, Some(2));
        assert_eq!(config.metabolism.hatch_age, 500);
        assert_eq!(config.brain.hidden_layers, vec![15, 15]);
    }

    #[test]
    fn test_toml_activation_names() {
        let config = AppConfig::from_toml(
            r#"
            [brain.activations]
            input = "identity"
            hidden = "tanh"
            output = "sigmoid"
            "#,
        )
        .expect("activation names should parse");
        assert_eq!(
            config.brain.activations.hidden,
            protocell_data::Activation::Tanh
        );
    }

    #[test]
    fn test_default_topology() {
        let topology = AppConfig::default().brain.topology();
        assert_eq!(topology.layers, vec![7, 15, 15, 12]);
    }

    #[test]
    fn test_fingerprint_consistency() {
        let config1 = AppConfig::default();
        let config2 = AppConfig::default();
        assert_eq!(config1.fingerprint(), config2.fingerprint());

        let mut config3 = AppConfig::default();
        config3.metabolism.hatch_age = 10;
        assert_ne!(config1.fingerprint(), config3.fingerprint());
    }
}
