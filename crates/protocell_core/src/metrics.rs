//! Performance metrics collection for the simulation.
//!
//! Provides structured logging and metrics tracking for monitoring
//! simulation performance and health.

use crate::world::WorldStats;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Metrics collector for simulation statistics.
pub struct Metrics {
    tick_count: AtomicU64,
    cell_count: AtomicU64,
    food_count: AtomicU64,
    slow_ticks: AtomicU64,
    last_tick_nanos: AtomicU64,
    pub counters: Mutex<HashMap<String, AtomicU64>>,
    log_interval: u64,
    warn_tick: Duration,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(1000, Duration::from_millis(50))
    }
}

impl Metrics {
    /// Creates a collector that logs every `log_interval` ticks and warns on
    /// ticks slower than `warn_tick`.
    #[must_use]
    pub fn new(log_interval: u64, warn_tick: Duration) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            cell_count: AtomicU64::new(0),
            food_count: AtomicU64::new(0),
            slow_ticks: AtomicU64::new(0),
            last_tick_nanos: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            log_interval: log_interval.max(1),
            warn_tick,
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick with its duration.
    pub fn record_tick(&self, duration: Duration, stats: &WorldStats) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.cell_count.store(stats.cells as u64, Ordering::Relaxed);
        self.food_count
            .store((stats.plants + stats.meats) as u64, Ordering::Relaxed);
        self.last_tick_nanos
            .store(duration.as_nanos() as u64, Ordering::Relaxed);

        if duration > self.warn_tick {
            self.slow_ticks.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                tick = stats.tick,
                duration_ms = duration.as_millis() as u64,
                cells = stats.cells,
                "Slow tick"
            );
        }

        if tick % self.log_interval == 0 {
            tracing::info!(
                tick = stats.tick,
                cells = stats.cells,
                eggs = stats.eggs,
                plants = stats.plants,
                meats = stats.meats,
                duration_ms = duration.as_millis() as u64,
                updates_per_second = Self::updates_per_second(duration),
                "Simulation tick"
            );
        }
    }

    fn updates_per_second(duration: Duration) -> f64 {
        1.0 / duration.as_secs_f64().max(1e-9)
    }

    /// Increments a named counter.
    pub fn increment_counter(&self, name: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Reads a named counter, zero if never incremented.
    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn cell_count(&self) -> u64 {
        self.cell_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn food_count(&self) -> u64 {
        self.food_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn slow_ticks(&self) -> u64 {
        self.slow_ticks.load(Ordering::Relaxed)
    }

    /// Update rate implied by the most recent tick.
    #[must_use]
    pub fn last_updates_per_second(&self) -> f64 {
        let nanos = self.last_tick_nanos.load(Ordering::Relaxed);
        Self::updates_per_second(Duration::from_nanos(nanos))
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Logs a simulation event.
    pub fn log_event(&self, event_type: &str, details: &str) {
        tracing::info!(
            event_type = event_type,
            details = details,
            "Simulation event"
        );
    }
}

/// Installs the global `fmt` subscriber.
///
/// Defaults to `info`; `RUST_LOG` overrides the filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_thread_names(true)
            .finish(),
    )
    .ok();
}
