//! Domain types and models
//!
//! Everything that crosses a context boundary (foreground ↔ worker,
//! client ↔ server) is serde-serialisable and lives here.

pub mod geo;
pub mod message;
pub mod notification;
pub mod push;
pub mod session;

pub use geo::{Coordinate, DestinationZone, SampleOptions};
pub use message::WorkerMessage;
pub use notification::{
    NotificationAction, NotificationBuilder, NotificationOptions, NotificationPreset,
    NotificationRequest,
};
pub use push::{NotificationPermission, PushKeys, PushPayload, PushSubscription};
pub use session::{TrackingSession, TripPhase};
