//! Work shifts: one record per (operator, machine, interval) session.

pub mod model;
pub mod status;

pub use model::Shift;
pub use status::ShiftStatus;
