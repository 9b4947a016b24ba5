//! Push subscription negotiation

pub mod manager;
pub mod ports;
