//! Background worker logic
//!
//! The worker is modelled as a pure event handler: platform events and
//! foreground messages go in, side effects come out. Executing those effects
//! (presenting, timers, client messaging) is the runtime's job.

pub mod handler;
pub mod ports;
