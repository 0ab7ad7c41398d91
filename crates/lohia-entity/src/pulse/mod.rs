//! Append-only pulse log.

pub mod model;

pub use model::PulseLog;
