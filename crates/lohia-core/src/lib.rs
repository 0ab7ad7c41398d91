//! # lohia-core
//!
//! Core crate for the Lohia production monitor. Contains the unified error
//! system, configuration schemas, domain events, pagination types, and the
//! trait seam for the dashboard change notifier.
//!
//! This crate has **no** internal dependencies on other Lohia crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
