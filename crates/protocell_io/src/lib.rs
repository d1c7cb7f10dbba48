//! # Protocell IO
//!
//! Persistence layer for the Protocell simulation.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - Newline-delimited numeric field streams for cells, eggs and food
//! - The snapshot store with its JSON save summary

/// Error types and result aliases for I/O operations
pub mod error;
/// Line-oriented numeric field writer and reader
pub mod fields;
/// Field layouts of cells, eggs, genomes and food
pub mod records;
/// JSON helpers and the per-save summary
pub mod serialization;
/// Snapshot directories on disk
pub mod storage;

pub use error::{IoError, Result};
pub use serialization::{from_json, read_json_file, to_json, to_json_pretty, write_json_file, SaveSummary};
pub use storage::SnapshotStore;
