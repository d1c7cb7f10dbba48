//! Error types for the simulation core.
//!
//! Energy debt and other gameplay outcomes are plain state changes, not
//! errors. Only thread provisioning and worker failures surface here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// The host cannot provide the configured minimum of worker threads.
    #[error("Insufficient threads: {available} available, {minimum} required")]
    InsufficientThreads { available: usize, minimum: usize },

    /// A worker hung up without replying to a phase command.
    #[error("Worker {partition} lost during {phase} phase")]
    WorkerLost {
        partition: usize,
        phase: &'static str,
    },

    /// A worker panicked while processing a phase and returned its cells.
    #[error("Worker {partition} panicked during {phase} phase")]
    WorkerPanicked {
        partition: usize,
        phase: &'static str,
    },

    /// The panic flag was raised while a tick was in flight.
    #[error("Tick aborted during {phase} phase")]
    Aborted { phase: &'static str },

    /// A worker returned without releasing its view of the shared frame.
    #[error("Interaction frame still shared after barrier")]
    FrameStillShared,

    #[error("Failed to spawn worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    #[must_use]
    pub fn worker_lost(partition: usize, phase: &'static str) -> Self {
        Self::WorkerLost { partition, phase }
    }

    #[must_use]
    pub fn worker_panicked(partition: usize, phase: &'static str) -> Self {
        Self::WorkerPanicked { partition, phase }
    }

    #[must_use]
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether the failure leaves the world in an unusable state.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidConfig(_))
    }
}
