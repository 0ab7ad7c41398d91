//! # lohia-realtime
//!
//! In-process fan-out of machine domain events to live dashboard views.
//! Subscribers take a broadcast receiver per machine (or one for the whole
//! floor); the transport that carries events off-process is an external
//! concern.

pub mod hub;

pub use hub::MachineChannelHub;
