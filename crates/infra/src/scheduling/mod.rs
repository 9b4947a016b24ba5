//! Scheduling infrastructure
//!
//! The foreground sampling loop runs as a cancellable repeating task:
//! - Explicit lifecycle management (start/stop)
//! - Join handle for the spawned task
//! - Cancellation token support
//! - Timeout wrapping on each tick

pub mod error;
pub mod tracking_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use tracking_scheduler::{TrackingScheduler, TrackingSchedulerConfig};
