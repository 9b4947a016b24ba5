//! Local platform adapters
//!
//! Headless stand-ins for the platform facilities the core talks to: a
//! presenter that logs and remembers notifications, a sampler that replays a
//! recorded track, a push service issuing local subscriptions, and worker
//! state stores.

pub mod geo;
pub mod presenter;
pub mod push;
pub mod store;

pub use geo::ReplayGeoSampler;
pub use presenter::LogNotificationPresenter;
pub use push::LocalPushService;
pub use store::{InMemoryStateStore, JsonFileStateStore};
