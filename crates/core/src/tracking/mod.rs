//! Trip tracking: the geofence state machine and the foreground service
//! that feeds it position samples.

pub mod machine;
pub mod ports;
pub mod service;

pub use machine::{GeofencePolicy, TrackingStateMachine, Transition};
pub use service::TrackingService;
