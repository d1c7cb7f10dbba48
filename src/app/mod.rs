pub mod input;
pub mod shutdown;
pub mod state;

pub use shutdown::ShutdownManager;
pub use state::{load_config, App, AppOptions};

use anyhow::Result;
use std::time::{Duration, Instant};

use protocell_core::world::StepReport;

/// Poll interval while paused.
const PAUSE_POLL: Duration = Duration::from_millis(16);

impl App {
    /// Runs ticks until a stop signal, the tick limit or extinction.
    pub fn run(&mut self) -> Result<()> {
        while self.running && !self.signals.should_stop() {
            if self.controls.take_save_request() {
                self.save_logged("manual");
            }

            if self.controls.is_paused() {
                std::thread::sleep(PAUSE_POLL);
                continue;
            }

            self.tick()?;
            self.maybe_autosave(Instant::now());

            if self.tick_limit.is_some_and(|limit| self.ticks_run >= limit) {
                tracing::info!(ticks = self.ticks_run, "Tick limit reached");
                self.running = false;
            } else if self.is_extinct() {
                tracing::info!(tick = self.sim.tick, "Population extinct");
                self.running = false;
            }
        }
        Ok(())
    }

    /// Runs one tick and records its timing.
    pub fn tick(&mut self) -> Result<StepReport> {
        let start = Instant::now();
        let report = match self.sim.step(&mut self.coordinator) {
            Ok(report) => report,
            Err(e) => {
                if e.is_fatal() {
                    self.signals.request_panic();
                }
                tracing::error!(error = %e, tick = self.sim.tick, "Tick failed");
                return Err(e.into());
            }
        };
        self.ticks_run += 1;
        self.metrics.record_tick(start.elapsed(), &self.sim.stats());
        if report.tick.overlapping > 0 || report.tick.missed > 0 {
            tracing::warn!(
                overlapping = report.tick.overlapping,
                missed = report.tick.missed,
                "Partition coverage mismatch"
            );
        }
        Ok(report)
    }

    /// Saves when the autosave period has elapsed; never while paused.
    pub fn maybe_autosave(&mut self, now: Instant) -> bool {
        if !self.autosave || self.controls.is_paused() {
            return false;
        }
        if now.saturating_duration_since(self.last_save) < self.autosave_period {
            return false;
        }
        self.save_logged("autosave")
    }

    fn save_logged(&mut self, reason: &str) -> bool {
        match self.save_state() {
            Ok(path) => {
                tracing::info!(reason, path = %path.display(), tick = self.sim.tick, "World saved");
                true
            }
            Err(e) => {
                tracing::error!(reason, error = %e, "Save failed");
                false
            }
        }
    }
}
