//! # SpotSurfer App
//!
//! Composition root and headless driver.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Tracing initialisation
//! - The `spotsurfer` binary, which replays a recorded track through the
//!   foreground service and the background worker
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod context;
pub mod utils;

pub use context::*;
