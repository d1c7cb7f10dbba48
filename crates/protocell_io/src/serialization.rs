//! JSON helpers and the summary written next to every snapshot.

use crate::error::{IoError, Result};
use protocell_core::world::WorldStats;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata stored as `summary.json` in a snapshot directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSummary {
    pub tick: u64,
    pub cells: usize,
    pub eggs: usize,
    pub plants: usize,
    pub meats: usize,
    /// Hash of the simulation-relevant config sections at save time.
    pub fingerprint: String,
    /// RFC 3339 wall-clock time of the save.
    pub saved_at: String,
}

impl SaveSummary {
    #[must_use]
    pub fn new(stats: &WorldStats, fingerprint: String) -> Self {
        Self {
            tick: stats.tick,
            cells: stats.cells,
            eggs: stats.eggs,
            plants: stats.plants,
            meats: stats.meats,
            fingerprint,
            saved_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Serializes data to JSON.
pub fn to_json<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

/// Serializes data to pretty-printed JSON.
pub fn to_json_pretty<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

/// Deserializes data from a JSON string.
///
/// # Returns
/// `IoError::Validation` for an empty string, `IoError::Serialization` for
/// malformed input.
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(IoError::validation("Empty JSON string"));
    }

    serde_json::from_str(json)
        .map_err(|e| IoError::serialization(format!("JSON deserialization failed: {}", e)))
}

/// Writes pretty JSON to `path`.
pub fn write_json_file<T, P>(data: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let json = to_json_pretty(data)?;
    std::fs::write(&path, json).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("writing JSON to {:?}", path.as_ref()))
    })?;
    Ok(())
}

/// Reads and deserializes JSON from `path`.
pub fn read_json_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let json = std::fs::read_to_string(&path).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("reading JSON from {:?}", path.as_ref()))
    })?;
    from_json(&json)
}
