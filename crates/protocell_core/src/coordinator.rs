//! Partitioned, barrier-synchronised execution of a simulation tick.
//!
//! One long-lived worker thread exists per partition. Partition `p` of `N`
//! owns cell indices `p, p + N, p + 2N, ...`. A tick runs two phases:
//!
//! 1. **Interaction**: the population is frozen into a shared
//!    [`InteractionFrame`]. Every worker reads all of it, computes sensor
//!    readings for its own cells and emits [`InteractionCommand`]s. Nothing
//!    is written to shared state.
//! 2. **Tick**: after the commands are applied on the coordinator thread,
//!    each worker receives exclusive ownership of its cells, advances them
//!    and hands them back.
//!
//! The coordinator waits for a report from every worker before moving on,
//! so each phase is a full barrier.

use crate::config::{AppConfig, ThreadConfig};
use crate::error::{Result, SimError};
use crate::interaction::InteractionCommand;
use crate::lifecycle;
use crate::signals::Signals;
use crate::systems::action::tick_cell;
use crate::systems::interaction::{apply_commands, scan_cell, AppliedEffects};
use protocell_data::{Cell, Food, Sensor};
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Read-only view of the world during the interaction phase.
#[derive(Debug, Default)]
pub struct InteractionFrame {
    pub cells: Vec<Cell>,
    pub foods: Vec<Food>,
}

/// Cells owned by one partition, tagged with their population index.
pub type CellBatch = Vec<(usize, Cell)>;

enum PhaseCommand {
    Interact(Arc<InteractionFrame>),
    Tick(CellBatch),
    Stop,
}

enum PhaseReport {
    Interacted {
        sensors: Vec<(usize, Sensor)>,
        commands: Vec<InteractionCommand>,
        visited: Vec<usize>,
    },
    Ticked { batch: CellBatch, ticked: usize },
    /// The panic flag was raised; any batch is handed back untouched.
    Aborted(CellBatch),
    /// Processing panicked; the batch comes back as far as it got.
    Panicked(CellBatch),
}

/// Indices owned by `partition` out of `partitions` for a population of `len`.
pub fn partition_indices(
    partition: usize,
    partitions: usize,
    len: usize,
) -> impl Iterator<Item = usize> {
    (partition..len).step_by(partitions.max(1))
}

/// Outcome of one coordinated tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub scanned: usize,
    pub ticked: usize,
    pub effects: AppliedEffects,
    /// Cells visited by more than one partition in the interaction phase.
    pub overlapping: usize,
    /// Cells no partition visited in the interaction phase.
    pub missed: usize,
    pub duration: Duration,
}

struct Worker {
    partition: usize,
    commands: Sender<PhaseCommand>,
    reports: Receiver<PhaseReport>,
    handle: Option<JoinHandle<()>>,
}

fn interact(
    partition: usize,
    partitions: usize,
    frame: &InteractionFrame,
    config: &AppConfig,
) -> PhaseReport {
    let mut sensors = Vec::new();
    let mut commands = Vec::new();
    let mut visited = Vec::new();
    for index in partition_indices(partition, partitions, frame.cells.len()) {
        visited.push(index);
        if let Some(sensor) = scan_cell(
            index,
            &frame.cells,
            &frame.foods,
            &config.interaction,
            &mut commands,
        ) {
            sensors.push((index, sensor));
        }
    }
    PhaseReport::Interacted {
        sensors,
        commands,
        visited,
    }
}

fn worker_loop(
    partition: usize,
    partitions: usize,
    config: Arc<AppConfig>,
    signals: Signals,
    commands: Receiver<PhaseCommand>,
    reports: Sender<PhaseReport>,
) {
    while let Ok(command) = commands.recv() {
        let report = match command {
            PhaseCommand::Interact(frame) => {
                let report = if signals.is_panic_requested() {
                    PhaseReport::Aborted(Vec::new())
                } else {
                    panic::catch_unwind(AssertUnwindSafe(|| {
                        interact(partition, partitions, &frame, &config)
                    }))
                    .unwrap_or_else(|_| {
                        tracing::error!(partition, "Interaction panicked");
                        PhaseReport::Panicked(Vec::new())
                    })
                };
                // Released before replying so the coordinator can reclaim the frame.
                drop(frame);
                report
            }
            PhaseCommand::Tick(mut batch) => {
                if signals.is_panic_requested() {
                    PhaseReport::Aborted(batch)
                } else {
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                        let mut ticked = 0;
                        for (_, cell) in &mut batch {
                            if lifecycle::is_alive(cell) {
                                tick_cell(cell, &config);
                                ticked += 1;
                            }
                        }
                        ticked
                    }));
                    match outcome {
                        Ok(ticked) => PhaseReport::Ticked { batch, ticked },
                        Err(_) => {
                            tracing::error!(partition, cells = batch.len(), "Tick panicked");
                            PhaseReport::Panicked(batch)
                        }
                    }
                }
            }
            PhaseCommand::Stop => break,
        };
        if reports.send(report).is_err() {
            break;
        }
    }
    tracing::debug!(partition, "Partition worker stopped");
}

/// Keeps the first failure seen during a phase.
fn record(failure: &mut Option<SimError>, error: SimError) {
    if failure.is_none() {
        *failure = Some(error);
    }
}

/// Number of threads the host can run in parallel.
#[must_use]
pub fn available_threads() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

/// Validates the host thread count and resolves the partition count.
///
/// Below `minimum` is fatal; below `recommended` only logs a warning. Without
/// an explicit count one thread is left for the lifecycle step.
pub fn check_threads(config: &ThreadConfig, available: usize) -> Result<usize> {
    if available < config.minimum {
        return Err(SimError::InsufficientThreads {
            available,
            minimum: config.minimum,
        });
    }
    if available < config.recommended {
        tracing::warn!(
            available,
            recommended = config.recommended,
            "Thread hint does not meet recommended thread count"
        );
    }
    Ok(config
        .partitions
        .unwrap_or_else(|| available.saturating_sub(1).max(1)))
}

/// Owns the partition workers and drives them through each tick.
pub struct Coordinator {
    workers: Vec<Worker>,
    signals: Signals,
}

impl Coordinator {
    /// Checks the host thread count and spawns the configured workers.
    ///
    /// Raises the panic flag when the host is below the minimum.
    pub fn from_config(config: Arc<AppConfig>, signals: Signals) -> Result<Self> {
        let partitions = match check_threads(&config.threads, available_threads()) {
            Ok(partitions) => partitions,
            Err(e) => {
                tracing::error!(error = %e, "Thread check failed");
                signals.request_panic();
                return Err(e);
            }
        };
        Self::spawn(config, signals, partitions)
    }

    /// Spawns exactly `partitions` workers.
    pub fn spawn(config: Arc<AppConfig>, signals: Signals, partitions: usize) -> Result<Self> {
        if partitions == 0 {
            return Err(SimError::invalid_config("Partition count must be positive"));
        }
        let mut workers = Vec::with_capacity(partitions);
        for partition in 0..partitions {
            let (command_tx, command_rx) = mpsc::channel();
            let (report_tx, report_rx) = mpsc::channel();
            let config = Arc::clone(&config);
            let worker_signals = signals.clone();
            let handle = thread::Builder::new()
                .name(format!("partition-{partition}"))
                .spawn(move || {
                    worker_loop(
                        partition,
                        partitions,
                        config,
                        worker_signals,
                        command_rx,
                        report_tx,
                    );
                })?;
            workers.push(Worker {
                partition,
                commands: command_tx,
                reports: report_rx,
                handle: Some(handle),
            });
        }
        tracing::info!(partitions, "Partition workers started");
        Ok(Self { workers, signals })
    }

    #[must_use]
    pub fn partitions(&self) -> usize {
        self.workers.len()
    }

    /// Runs the interaction phase, applies its effects, then runs the tick
    /// phase.
    ///
    /// `cells` and `foods` are restored on every path where the worker
    /// replies, including a panic inside the tick; a cell that panicked may
    /// be partially advanced. Only [`SimError::WorkerLost`] in the tick
    /// phase loses the cells held by that worker, and the world should be
    /// discarded after it.
    pub fn run_tick(&mut self, cells: &mut Vec<Cell>, foods: &mut Vec<Food>) -> Result<TickReport> {
        let start = Instant::now();
        if self.signals.is_panic_requested() {
            return Err(SimError::Aborted {
                phase: "interaction",
            });
        }

        let mut report = self.interaction_phase(cells, foods)?;
        report.ticked = self.tick_phase(cells)?;
        report.duration = start.elapsed();
        Ok(report)
    }

    fn interaction_phase(
        &mut self,
        cells: &mut Vec<Cell>,
        foods: &mut Vec<Food>,
    ) -> Result<TickReport> {
        let frame = Arc::new(InteractionFrame {
            cells: mem::take(cells),
            foods: mem::take(foods),
        });
        let len = frame.cells.len();

        let mut failure = None;
        let mut dispatched = Vec::with_capacity(self.workers.len());
        for worker in &self.workers {
            let sent = worker
                .commands
                .send(PhaseCommand::Interact(Arc::clone(&frame)))
                .is_ok();
            if !sent {
                record(&mut failure, SimError::worker_lost(worker.partition, "interaction"));
            }
            dispatched.push(sent);
        }

        let mut sensors = Vec::with_capacity(len);
        let mut commands = Vec::new();
        let mut visits = vec![0u8; len];
        for (worker, sent) in self.workers.iter().zip(dispatched) {
            if !sent {
                continue;
            }
            match worker.reports.recv() {
                Ok(PhaseReport::Interacted {
                    sensors: partial_sensors,
                    commands: partial_commands,
                    visited,
                }) => {
                    sensors.extend(partial_sensors);
                    commands.extend(partial_commands);
                    for index in visited {
                        if let Some(count) = visits.get_mut(index) {
                            *count = count.saturating_add(1);
                        }
                    }
                }
                Ok(PhaseReport::Panicked(_)) => {
                    record(&mut failure, SimError::worker_panicked(worker.partition, "interaction"));
                }
                Ok(_) => {
                    record(&mut failure, SimError::Aborted {
                        phase: "interaction",
                    });
                }
                Err(_) => {
                    tracing::error!(partition = worker.partition, "Worker lost during interaction");
                    record(&mut failure, SimError::worker_lost(worker.partition, "interaction"));
                }
            }
        }

        let frame = Arc::try_unwrap(frame).map_err(|_| SimError::FrameStillShared)?;
        *cells = frame.cells;
        *foods = frame.foods;
        if let Some(e) = failure {
            return Err(e);
        }

        for (index, sensor) in &sensors {
            cells[*index].sensor = *sensor;
        }
        let effects = apply_commands(cells, foods, commands);

        Ok(TickReport {
            scanned: sensors.len(),
            effects,
            overlapping: visits.iter().filter(|&&v| v > 1).count(),
            missed: visits.iter().filter(|&&v| v == 0).count(),
            ..TickReport::default()
        })
    }

    fn tick_phase(&mut self, cells: &mut Vec<Cell>) -> Result<usize> {
        let partitions = self.workers.len();
        let len = cells.len();
        let mut batches: Vec<CellBatch> = (0..partitions).map(|_| Vec::new()).collect();
        for (index, cell) in mem::take(cells).into_iter().enumerate() {
            batches[index % partitions].push((index, cell));
        }

        let mut failure = None;
        let mut slots: Vec<Option<Cell>> = (0..len).map(|_| None).collect();
        let mut dispatched = Vec::with_capacity(partitions);
        for (worker, batch) in self.workers.iter().zip(batches) {
            match worker.commands.send(PhaseCommand::Tick(batch)) {
                Ok(()) => dispatched.push(true),
                Err(mpsc::SendError(command)) => {
                    if let PhaseCommand::Tick(batch) = command {
                        for (index, cell) in batch {
                            slots[index] = Some(cell);
                        }
                    }
                    record(&mut failure, SimError::worker_lost(worker.partition, "tick"));
                    dispatched.push(false);
                }
            }
        }

        let mut ticked = 0;
        for (worker, sent) in self.workers.iter().zip(dispatched) {
            if !sent {
                continue;
            }
            match worker.reports.recv() {
                Ok(PhaseReport::Ticked {
                    batch,
                    ticked: partial,
                }) => {
                    ticked += partial;
                    for (index, cell) in batch {
                        slots[index] = Some(cell);
                    }
                }
                Ok(PhaseReport::Aborted(batch)) => {
                    for (index, cell) in batch {
                        slots[index] = Some(cell);
                    }
                    record(&mut failure, SimError::Aborted { phase: "tick" });
                }
                Ok(PhaseReport::Panicked(batch)) => {
                    for (index, cell) in batch {
                        slots[index] = Some(cell);
                    }
                    record(&mut failure, SimError::worker_panicked(worker.partition, "tick"));
                }
                Ok(PhaseReport::Interacted { .. }) => {
                    record(&mut failure, SimError::Aborted { phase: "tick" });
                }
                Err(_) => {
                    tracing::error!(partition = worker.partition, "Worker lost during tick");
                    record(&mut failure, SimError::worker_lost(worker.partition, "tick"));
                }
            }
        }

        cells.extend(slots.into_iter().flatten());
        match failure {
            Some(e) => Err(e),
            None => Ok(ticked),
        }
    }

    /// Stops and joins every worker.
    pub fn shutdown(&mut self) {
        for worker in &self.workers {
            let _ = worker.commands.send(PhaseCommand::Stop);
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    tracing::error!(partition = worker.partition, "Partition worker panicked");
                }
            }
        }
        if !self.workers.is_empty() {
            tracing::info!("Partition workers stopped");
        }
        self.workers.clear();
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}
