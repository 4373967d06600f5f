//! Daemon: alternating-year poll scheduler and cycle wiring.
//!
//! The daemon crawls a two-year rolling window of a published calendar,
//! one year per cycle, and emits only listings absent from the persisted
//! snapshot. See [`cycle::run_cycle`] for one pass and
//! [`scheduler::PollScheduler`] for the perpetual driver.

mod config;
mod cycle;
mod error;
mod scheduler;

pub use config::{
    DEFAULT_CALENDAR_URL, DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT, ServerConfig,
};
pub use cycle::run_cycle;
pub use error::{ServerError, ServerResult};
pub use scheduler::{
    PollScheduler, SchedulerCommand, SchedulerConfig, SchedulerHandle, SchedulerState,
    SharedSchedulerState, year_for_cycle,
};
