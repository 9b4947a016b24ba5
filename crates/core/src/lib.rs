//! # SpotSurfer Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for every platform seam
//! - The trip-tracking state machine and the foreground tracking service
//! - Push subscription negotiation
//! - The background worker's event handler
//!
//! ## Architecture Principles
//! - Only depends on `spotsurfer-domain`
//! - No HTTP, timers or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod geo;
pub mod notification;
pub mod push;
pub mod tracking;
pub mod worker;

// Re-export specific items to avoid ambiguity
pub use geo::distance::distance;
pub use geo::ports::GeoSampler;
pub use notification::channel::{
    DirectNotificationChannel, RoutedNotificationChannel, WorkerNotificationChannel,
};
pub use notification::ports::{NotificationChannel, NotificationPresenter, WorkerPort};
pub use push::manager::PushSubscriptionManager;
pub use push::ports::{PushService, SubscriptionRegistrar};
pub use tracking::machine::{GeofencePolicy, TrackingStateMachine, Transition};
pub use tracking::ports::TripAnnouncer;
pub use tracking::service::{StartReport, TickOutcome, TrackingOptions, TrackingService};
pub use worker::handler::{focus_target, BackgroundWorker, WorkerEffect, WorkerEvent, WorkerState};
pub use worker::ports::{ClientInfo, ClientKind, ClientRegistry, WorkerStateStore};
