use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use protocell_core::snapshot::WorldView;
use protocell_core::{AppConfig, Controls, Coordinator, Metrics, Signals, Simulation};
use protocell_io::SnapshotStore;

/// Startup choices collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub config_path: Option<PathBuf>,
    pub load: Option<PathBuf>,
    pub ticks: Option<u64>,
    pub partitions: Option<usize>,
    pub seed: Option<u64>,
    pub no_autosave: bool,
}

pub struct App {
    pub running: bool,
    pub sim: Simulation,
    pub coordinator: Coordinator,
    pub config: Arc<AppConfig>,
    pub signals: Signals,
    pub controls: Controls,
    pub metrics: Metrics,
    pub store: SnapshotStore,
    /// Stop after this many ticks have run in this process.
    pub tick_limit: Option<u64>,
    pub ticks_run: u64,
    pub autosave: bool,
    pub autosave_period: Duration,
    pub last_save: Instant,
    pub last_save_path: Option<PathBuf>,
}

/// Reads `path` as TOML, or falls back to defaults when it does not exist.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let Some(path) = path else {
        return Ok(AppConfig::default());
    };
    if !path.exists() {
        tracing::info!(path = %path.display(), "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    AppConfig::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))
}

impl App {
    pub fn new(options: AppOptions, signals: Signals) -> Result<Self> {
        let mut config = load_config(options.config_path.as_deref())?;
        if let Some(seed) = options.seed {
            config.world.seed = Some(seed);
        }
        if let Some(partitions) = options.partitions {
            config.threads.partitions = Some(partitions);
        }
        if options.no_autosave {
            config.persistence.autosave = false;
        }
        config.validate()?;
        let config = Arc::new(config);

        let store = SnapshotStore::from_config(&config.persistence);
        let sim = match &options.load {
            Some(dir) => store
                .load(dir, Arc::clone(&config))
                .with_context(|| format!("loading snapshot {}", dir.display()))?,
            None => {
                let mut sim = Simulation::new(Arc::clone(&config));
                sim.seed_environment();
                sim
            }
        };

        let coordinator = Coordinator::from_config(Arc::clone(&config), signals.clone())?;
        tracing::info!(
            partitions = coordinator.partitions(),
            tick = sim.tick,
            cells = sim.cells.len(),
            eggs = sim.eggs.len(),
            foods = sim.foods.len(),
            "Simulation ready"
        );

        Ok(Self {
            running: true,
            sim,
            coordinator,
            signals,
            controls: Controls::new(),
            metrics: Metrics::new(
                config.log_interval,
                Duration::from_millis(config.warn_tick_ms),
            ),
            store,
            tick_limit: options.ticks,
            ticks_run: 0,
            autosave: config.persistence.autosave,
            autosave_period: Duration::from_secs(config.persistence.autosave_period_secs),
            last_save: Instant::now(),
            last_save_path: None,
            config,
        })
    }

    /// Writes a snapshot and resets the autosave timer.
    pub fn save_state(&mut self) -> Result<PathBuf> {
        let path = self.store.save(&self.sim)?;
        self.last_save = Instant::now();
        self.last_save_path = Some(path.clone());
        self.metrics.increment_counter("saves");
        self.metrics
            .log_event("save", &format!("tick {} to {}", self.sim.tick, path.display()));
        Ok(path)
    }

    /// Read-only view of the current world for rendering or inspection.
    #[must_use]
    pub fn view(&self) -> WorldView {
        WorldView::capture(&self.sim)
    }

    #[must_use]
    pub fn is_extinct(&self) -> bool {
        self.sim.cells.is_empty() && self.sim.eggs.is_empty()
    }
}
