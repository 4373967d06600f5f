//! Core types: listing records, identity keys, event sets, tracing setup.

pub mod event;
pub mod key;
pub mod tracing;

pub use event::{EventSet, Listing};
pub use key::EventKey;
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
