//! Background worker runtime
//!
//! Hosts a [`spotsurfer_core::BackgroundWorker`] on its own task: events are
//! processed one at a time in arrival order, and the resulting effects are
//! carried out against the platform ports.

pub mod clients;
pub mod runtime;

pub use clients::{ClientConnection, LocalClientRegistry};
pub use runtime::{WorkerHandle, WorkerRuntime};
