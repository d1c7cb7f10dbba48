//! On-disk world snapshots.
//!
//! A snapshot is a directory `save_<timestamp>` under the store root holding
//! four field streams (`cells`, `eggs`, `plants`, `meats`) and a
//! `summary.json`.

use crate::error::{IoError, Result};
use crate::fields::{FieldReader, FieldWriter};
use crate::records::{read_all, read_food, write_all, write_food};
use crate::serialization::{read_json_file, write_json_file, SaveSummary};
use protocell_core::config::{AppConfig, PersistenceConfig};
use protocell_core::world::Simulation;
use protocell_data::{Cell, Egg, FoodKind};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const CELLS_STREAM: &str = "cells";
pub const EGGS_STREAM: &str = "eggs";
pub const PLANTS_STREAM: &str = "plants";
pub const MEATS_STREAM: &str = "meats";
pub const SUMMARY_FILE: &str = "summary.json";
const SAVE_PREFIX: &str = "save_";

/// Directory of saved worlds.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &PersistenceConfig) -> Self {
        Self::new(&config.saves_dir)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the world into a new `save_<timestamp>` directory and returns
    /// its path.
    pub fn save(&self, sim: &Simulation) -> Result<PathBuf> {
        fs::create_dir_all(&self.root).map_err(|e| {
            IoError::FileSystem(e).with_context(format!("creating {:?}", self.root))
        })?;
        let dir = self.fresh_dir()?;

        let cells = write_stream(&dir, CELLS_STREAM, |out| write_all(out, &sim.cells))?;
        let eggs = write_stream(&dir, EGGS_STREAM, |out| write_all(out, &sim.eggs))?;
        let plants = write_stream(&dir, PLANTS_STREAM, |out| {
            write_food(out, FoodKind::Plant, &sim.foods)
        })?;
        let meats = write_stream(&dir, MEATS_STREAM, |out| {
            write_food(out, FoodKind::Meat, &sim.foods)
        })?;

        let summary = SaveSummary::new(&sim.stats(), sim.config().fingerprint());
        write_json_file(&summary, dir.join(SUMMARY_FILE))?;

        tracing::debug!(
            path = %dir.display(),
            tick = sim.tick,
            cells,
            eggs,
            plants,
            meats,
            "World saved"
        );
        Ok(dir)
    }

    /// Rebuilds a world from the snapshot at `dir`.
    ///
    /// A missing summary restarts the tick counter at zero; a fingerprint
    /// differing from `config` is logged and otherwise ignored.
    pub fn load<P: AsRef<Path>>(&self, dir: P, config: Arc<AppConfig>) -> Result<Simulation> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(IoError::not_found(dir.display().to_string()));
        }

        let summary_path = dir.join(SUMMARY_FILE);
        let tick = if summary_path.exists() {
            let summary: SaveSummary = read_json_file(&summary_path)?;
            if summary.fingerprint != config.fingerprint() {
                tracing::warn!(
                    path = %dir.display(),
                    "Snapshot was written with a different simulation config"
                );
            }
            summary.tick
        } else {
            tracing::warn!(path = %dir.display(), "Snapshot has no summary, starting at tick 0");
            0
        };

        let cells: Vec<Cell> = read_stream(dir, CELLS_STREAM, |input| read_all(input, &config))?;
        let eggs: Vec<Egg> = read_stream(dir, EGGS_STREAM, |input| read_all(input, &config))?;
        let mut foods = read_stream(dir, PLANTS_STREAM, |input| read_food(input, FoodKind::Plant))?;
        foods.extend(read_stream(dir, MEATS_STREAM, |input| {
            read_food(input, FoodKind::Meat)
        })?);

        tracing::info!(
            path = %dir.display(),
            tick,
            cells = cells.len(),
            eggs = eggs.len(),
            foods = foods.len(),
            "World loaded"
        );
        Ok(Simulation::from_parts(config, tick, cells, eggs, foods))
    }

    /// Snapshot directories under the root, oldest first.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut saves = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let is_save = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(SAVE_PREFIX));
            if is_save && entry.file_type()?.is_dir() {
                saves.push(entry.path());
            }
        }
        saves.sort();
        Ok(saves)
    }

    /// Most recent snapshot, if any.
    pub fn latest(&self) -> Result<Option<PathBuf>> {
        Ok(self.list()?.pop())
    }

    fn fresh_dir(&self) -> Result<PathBuf> {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string();
        let base = self.root.join(format!("{SAVE_PREFIX}{stamp}"));
        let mut dir = base.clone();
        let mut suffix = 1;
        while dir.exists() {
            dir = PathBuf::from(format!("{}_{suffix}", base.display()));
            suffix += 1;
        }
        fs::create_dir(&dir)
            .map_err(|e| IoError::FileSystem(e).with_context(format!("creating {:?}", dir)))?;
        Ok(dir)
    }
}

fn write_stream<F>(dir: &Path, stream: &str, body: F) -> Result<usize>
where
    F: FnOnce(&mut FieldWriter<BufWriter<File>>) -> Result<usize>,
{
    let path = dir.join(stream);
    let file = File::create(&path)
        .map_err(|e| IoError::FileSystem(e).with_context(format!("creating {:?}", path)))?;
    let mut out = FieldWriter::new(BufWriter::new(file));
    let count = body(&mut out)?;
    out.finish()?;
    Ok(count)
}

fn read_stream<T, F>(dir: &Path, stream: &str, body: F) -> Result<T>
where
    F: FnOnce(&mut FieldReader<'_>) -> Result<T>,
{
    let path = dir.join(stream);
    let content = fs::read_to_string(&path)
        .map_err(|e| IoError::FileSystem(e).with_context(format!("reading {:?}", path)))?;
    let mut input = FieldReader::new(stream, &content);
    body(&mut input)
}
