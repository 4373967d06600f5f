//! Alternating-year poll scheduler.
//!
//! The scheduler runs forever, toggling between the base year and the
//! following year on each cycle (0→1→0→1…, starting at the base year).
//! Cycles are strictly sequential: the next delay starts only after the
//! previous cycle fully settles. A cycle failure is logged, recorded in
//! the shared state, and treated as a zero-new-events cycle; nothing
//! terminates the loop except a `Stop` command or process death.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info, warn};

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// First year of the two-year rolling window.
    pub base_year: i32,
    /// Fixed delay between cycles.
    pub poll_interval: Duration,
}

impl SchedulerConfig {
    /// Creates a scheduler config for the given window and interval.
    pub fn new(base_year: i32, poll_interval: Duration) -> Self {
        Self {
            base_year,
            poll_interval,
        }
    }
}

/// Year targeted by the n-th cycle (0-based): the base year on even
/// cycles, the following year on odd ones.
pub fn year_for_cycle(base_year: i32, cycle: u64) -> i32 {
    base_year + (cycle % 2) as i32
}

/// Commands that can be sent to a running scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerCommand {
    /// Run a cycle immediately instead of waiting out the interval.
    CycleNow,
    /// Stop the scheduler loop.
    Stop,
}

/// Observable scheduler state.
#[derive(Debug, Clone, Default)]
pub struct SchedulerState {
    /// Cycles completed, successful or not.
    pub cycles_run: u64,
    /// Cycles that ended in an error.
    pub failed_cycles: u64,
    /// When the last cycle settled.
    pub last_cycle: Option<DateTime<Utc>>,
    /// New listings emitted by the last successful cycle.
    pub last_new_events: usize,
    /// Message from the last failed cycle.
    pub last_error: Option<String>,
}

impl SchedulerState {
    /// Records a settled successful cycle.
    pub fn record_cycle(&mut self, new_events: usize) {
        self.cycles_run += 1;
        self.last_cycle = Some(Utc::now());
        self.last_new_events = new_events;
        self.last_error = None;
    }

    /// Records a settled failed cycle. Failed cycles still advance the
    /// year alternation and emit nothing.
    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.cycles_run += 1;
        self.failed_cycles += 1;
        self.last_cycle = Some(Utc::now());
        self.last_new_events = 0;
        self.last_error = Some(error.into());
    }
}

/// Shared scheduler state.
pub type SharedSchedulerState = Arc<RwLock<SchedulerState>>;

/// The perpetual poll driver.
pub struct PollScheduler {
    config: SchedulerConfig,
    state: SharedSchedulerState,
    command_tx: mpsc::Sender<SchedulerCommand>,
    command_rx: Option<mpsc::Receiver<SchedulerCommand>>,
}

impl PollScheduler {
    /// Creates a scheduler with the given configuration.
    pub fn new(config: SchedulerConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel(8);
        Self {
            config,
            state: Arc::new(RwLock::new(SchedulerState::default())),
            command_tx,
            command_rx: Some(command_rx),
        }
    }

    /// Returns a handle for sending commands and reading state.
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            command_tx: self.command_tx.clone(),
            state: self.state.clone(),
        }
    }

    /// Returns the shared state.
    pub fn state(&self) -> SharedSchedulerState {
        self.state.clone()
    }

    /// Runs cycles until a `Stop` command arrives.
    ///
    /// `cycle_fn(year)` performs one full crawl-diff-publish pass for the
    /// given year and reports how many new listings it emitted. The first
    /// cycle runs immediately; each later cycle waits out the configured
    /// interval (or a `CycleNow` command, whichever comes first).
    pub async fn run<F, Fut>(mut self, cycle_fn: F)
    where
        F: Fn(i32) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<usize, String>> + Send,
    {
        let mut command_rx = self.command_rx.take().expect("run called twice");

        info!(
            base_year = self.config.base_year,
            interval_secs = self.config.poll_interval.as_secs(),
            "poll scheduler started"
        );

        self.do_cycle(&cycle_fn).await;

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.config.poll_interval) => {
                    self.do_cycle(&cycle_fn).await;
                }
                cmd = command_rx.recv() => match cmd {
                    Some(SchedulerCommand::CycleNow) => {
                        debug!("received CycleNow command");
                        self.do_cycle(&cycle_fn).await;
                    }
                    Some(SchedulerCommand::Stop) | None => {
                        info!("poll scheduler stopping");
                        break;
                    }
                },
            }
        }
    }

    async fn do_cycle<F, Fut>(&self, cycle_fn: &F)
    where
        F: Fn(i32) -> Fut,
        Fut: Future<Output = Result<usize, String>>,
    {
        let cycle = self.state.read().await.cycles_run;
        let year = year_for_cycle(self.config.base_year, cycle);
        debug!(cycle, year, "starting poll cycle");

        match cycle_fn(year).await {
            Ok(new_events) => {
                info!(cycle, year, new_events, "poll cycle finished");
                self.state.write().await.record_cycle(new_events);
            }
            Err(error) => {
                warn!(cycle, year, error = %error, "poll cycle failed");
                self.state.write().await.record_failure(error);
            }
        }
    }
}

/// Handle for a running scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    command_tx: mpsc::Sender<SchedulerCommand>,
    state: SharedSchedulerState,
}

impl SchedulerHandle {
    /// Triggers an immediate cycle.
    pub async fn cycle_now(&self) -> Result<(), mpsc::error::SendError<SchedulerCommand>> {
        self.command_tx.send(SchedulerCommand::CycleNow).await
    }

    /// Stops the scheduler.
    pub async fn stop(&self) -> Result<(), mpsc::error::SendError<SchedulerCommand>> {
        self.command_tx.send(SchedulerCommand::Stop).await
    }

    /// Returns a snapshot of the current state.
    pub async fn state(&self) -> SchedulerState {
        self.state.read().await.clone()
    }
}
