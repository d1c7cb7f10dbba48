//! # Protocell
//!
//! Application layer of the Protocell evolutionary cell simulation: config
//! loading, the run loop with autosave, stdin controls and graceful
//! shutdown. The simulation itself lives in `protocell_core`; snapshots in
//! `protocell_io`.

pub mod app;

pub use app::{App, AppOptions, ShutdownManager};
pub use protocell_core::{AppConfig, Controls, Signals, Simulation};
