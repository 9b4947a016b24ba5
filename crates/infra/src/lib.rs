//! # SpotSurfer Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Configuration loading (files + environment)
//! - HTTP clients for the remote assistant and subscription registrar
//! - The cancellable repeating sampler
//! - The background worker runtime and its in-process client registry
//! - Local platform adapters (presenter, replay sampler, push service)
//!
//! ## Architecture
//! - Implements traits defined in `spotsurfer-core`
//! - Contains all "impure" code (I/O, timers, network)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod platform;
pub mod scheduling;
pub mod worker;

// Re-export commonly used items
pub use api::{AskRequest, AskResponse, AssistantClient, HttpSubscriptionRegistrar};
pub use errors::InfraError;
pub use http::{RetryPolicy, ServerClient};
pub use platform::{
    InMemoryStateStore, JsonFileStateStore, LocalPushService, LogNotificationPresenter,
    ReplayGeoSampler,
};
pub use scheduling::{SchedulerError, SchedulerResult, TrackingScheduler, TrackingSchedulerConfig};
pub use worker::{LocalClientRegistry, WorkerHandle, WorkerRuntime};
