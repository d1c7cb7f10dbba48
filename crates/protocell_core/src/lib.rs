//! # Protocell Core
//!
//! The simulation engine for Protocell, an evolutionary cell simulation in
//! a continuous 2D world.
//!
//! This crate contains:
//! - Genome sampling and mutation, and the feed-forward brain evaluator
//! - Cell energy bookkeeping, digestion, reproduction and death
//! - Ray-cast sensing with deferred combat and feeding effects
//! - The partitioned tick coordinator and its worker threads
//! - Configuration, metrics and structured logging
//!
//! ## Architecture
//!
//! Entities live in plain `Vec` arenas owned by [`world::Simulation`]. Each
//! tick the [`coordinator::Coordinator`] runs an interaction phase over a
//! frozen frame of the world, applies the resulting
//! [`interaction::InteractionCommand`]s in caster order, then moves each
//! partition's cells to its worker for the tick phase. Births, excretion and
//! culling run single-threaded afterwards, so a seeded run is reproducible
//! regardless of the partition count.
//!
//! ## Example
//!
//! ```
//! use protocell_core::brain::{BrainLogic, GenomeLogic};
//! use protocell_core::config::AppConfig;
//! use protocell_data::{Brain, Genome};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let config = AppConfig::default();
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let genome = Genome::random_with_rng(&config.genome, &config.brain.topology(), &mut rng);
//! let mut brain = Brain::from_genome(&genome, config.brain.activations);
//!
//! brain.set_input(0, 0.5);
//! brain.evaluate();
//! assert_eq!(brain.outputs().len(), 12);
//! ```

/// Feed-forward brain and genome logic
pub mod brain;
/// Configuration management for simulation parameters
pub mod config;
/// Partition workers and the two-phase tick barrier
pub mod coordinator;
/// Typed errors of the simulation core
pub mod error;
/// Deferred effects emitted during the interaction phase
pub mod interaction;
/// Energy bookkeeping, birth and death
pub mod lifecycle;
/// Performance metrics collection and logging
pub mod metrics;
/// Gaussian and angle sampling helpers
pub mod random;
/// Shutdown, panic, pause and save flags
pub mod signals;
/// Read-only world views for rendering and inspection
pub mod snapshot;
/// Per-cell tick and interaction systems
pub mod systems;
/// World state and the lifecycle step
pub mod world;

pub use brain::{BrainLogic, GenomeLogic};
pub use config::AppConfig;
pub use coordinator::{Coordinator, TickReport};
pub use error::SimError;
pub use metrics::{init_logging, Metrics};
pub use signals::{Controls, Signals};
pub use world::{Simulation, StepReport, WorldStats};
