//! Pending Store module
//!
//! In-memory queue of donations that have been received from the producer
//! but not yet collected by the poller. Nothing survives a restart.

mod queue;

pub use queue::{PendingStore, Submission};
