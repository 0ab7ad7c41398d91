//! # lohia-entity
//!
//! Domain entities for the Lohia production monitor: machines and their
//! gear parameters, work shifts, maintenance calls, the append-only pulse
//! log, and the slim employee record consumed from the staff directory.
//!
//! Also defines the persistence trait seams ([`store::MonitorStore`],
//! [`store::EmployeeDirectory`]) implemented by `lohia-database`.

pub mod employee;
pub mod machine;
pub mod maintenance;
pub mod pulse;
pub mod shift;
pub mod store;

pub use employee::{Employee, EmployeeRole};
pub use machine::{Gearing, Machine, MachineSnapshot, MachineStatus};
pub use maintenance::{CallStatus, MaintenanceCall};
pub use pulse::PulseLog;
pub use shift::{Shift, ShiftStatus};
pub use store::{EmployeeDirectory, MonitorStore};
