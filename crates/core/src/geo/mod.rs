//! Position sampling port and the planar distance metric

pub mod distance;
pub mod ports;
