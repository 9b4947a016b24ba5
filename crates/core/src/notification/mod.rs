//! Notification delivery surface shared by the foreground and the worker

pub mod channel;
pub mod ports;
