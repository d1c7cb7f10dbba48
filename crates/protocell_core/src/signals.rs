//! Process-wide flags shared between the driver, the coordinator and the
//! partition workers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shutdown and panic requests, checked between ticks and at phase
/// boundaries.
#[derive(Debug, Clone, Default)]
pub struct Signals {
    shutdown: Arc<AtomicBool>,
    panic: Arc<AtomicBool>,
}

impl Signals {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests an orderly stop after the current tick.
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        tracing::info!("Shutdown requested");
    }

    /// Requests an immediate stop; in-flight work is abandoned.
    pub fn request_panic(&self) {
        self.panic.store(true, Ordering::SeqCst);
        tracing::error!("Panic requested");
    }

    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_panic_requested(&self) -> bool {
        self.panic.load(Ordering::SeqCst)
    }

    /// Whether the run loop should stop for either reason.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.is_shutdown_requested() || self.is_panic_requested()
    }
}

/// Requests coming from the render/input side.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    paused: Arc<AtomicBool>,
    save_requested: Arc<AtomicBool>,
}

impl Controls {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }

    /// Flips the pause flag and returns the new state.
    pub fn toggle_pause(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn request_save(&self) {
        self.save_requested.store(true, Ordering::SeqCst);
    }

    /// Consumes a pending save request.
    pub fn take_save_request(&self) -> bool {
        self.save_requested.swap(false, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signals_shared_between_clones() {
        let signals = Signals::new();
        let worker_view = signals.clone();
        assert!(!worker_view.should_stop());

        signals.request_shutdown();
        assert!(worker_view.is_shutdown_requested());
        assert!(!worker_view.is_panic_requested());
        assert!(worker_view.should_stop());
    }

    #[test]
    fn test_panic_flag() {
        let signals = Signals::new();
        signals.clone().request_panic();
        assert!(signals.is_panic_requested());
        assert!(signals.should_stop());
    }

    #[test]
    fn test_toggle_pause() {
        let controls = Controls::new();
        assert!(controls.toggle_pause());
        assert!(controls.is_paused());
        assert!(!controls.toggle_pause());
        assert!(!controls.is_paused());
    }

    #[test]
    fn test_save_request_is_consumed() {
        let controls = Controls::new();
        assert!(!controls.take_save_request());
        controls.request_save();
        assert!(controls.take_save_request());
        assert!(!controls.take_save_request());
    }
}
