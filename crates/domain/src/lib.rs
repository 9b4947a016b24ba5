//! # SpotSurfer Domain
//!
//! Business domain types for the SpotSurfer trip tracker.
//!
//! This crate contains:
//! - Geolocation, session and notification data types
//! - The foreground/worker message contract
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other SpotSurfer crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
