//! HTTP client

pub mod client;

pub use client::{RetryPolicy, ServerClient};
