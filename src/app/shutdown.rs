//! Graceful shutdown handling for the application.
//!
//! Decides whether to save on the way out and stops the partition workers.

use anyhow::Result;
use protocell_core::Signals;
use std::path::PathBuf;

/// Manages graceful shutdown of the application.
pub struct ShutdownManager {
    signals: Signals,
    save_on_exit: bool,
    exit_code: i32,
}

impl ShutdownManager {
    /// Creates a new shutdown manager over the process signals.
    pub fn new(signals: Signals) -> Self {
        Self {
            signals,
            save_on_exit: true,
            exit_code: 0,
        }
    }

    /// Sets whether to save state on exit.
    pub fn set_save_on_exit(&mut self, save: bool) {
        self.save_on_exit = save;
    }

    /// Requests shutdown.
    pub fn request_shutdown(&self) {
        self.signals.request_shutdown();
    }

    /// Checks if shutdown has been requested.
    pub fn is_shutdown_requested(&self) -> bool {
        self.signals.is_shutdown_requested()
    }

    /// Saving is skipped after a panic; the world may be partially ticked.
    pub fn should_save_on_exit(&self) -> bool {
        self.save_on_exit && !self.signals.is_panic_requested()
    }

    /// Sets the exit code.
    pub fn set_exit_code(&mut self, code: i32) {
        self.exit_code = code;
    }

    /// Exit code, forced to 1 after a panic.
    pub fn exit_code(&self) -> i32 {
        if self.signals.is_panic_requested() {
            1
        } else {
            self.exit_code
        }
    }

    /// Performs cleanup operations before shutdown.
    pub fn cleanup(&self, app: &mut crate::app::App) -> Result<Option<PathBuf>> {
        tracing::info!("Performing shutdown cleanup...");

        let saved = if self.should_save_on_exit() {
            tracing::info!("Saving state before exit...");
            Some(app.save_state()?)
        } else {
            None
        };
        app.coordinator.shutdown();

        tracing::info!(
            tick = app.sim.tick,
            elapsed_secs = app.metrics.elapsed().as_secs(),
            "Cleanup complete"
        );
        Ok(saved)
    }
}
