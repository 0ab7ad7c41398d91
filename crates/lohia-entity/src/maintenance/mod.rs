//! Maintenance calls: one record per fault-report-to-resolution cycle.

pub mod model;
pub mod status;

pub use model::MaintenanceCall;
pub use status::CallStatus;
