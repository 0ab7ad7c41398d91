//! # lohia-service
//!
//! The monitor's workflows: machine provisioning, the shift ledger, the
//! high-frequency pulse ingest path, the maintenance call lifecycle, and
//! the badge router that dispatches RFID scans onto all of the above.
//!
//! Every mutating operation serializes against the machine it touches via
//! [`MachineLocks`]; operations on different machines never contend.

pub mod badge;
pub mod locks;
pub mod machine;
pub mod maintenance;
pub mod outcome;
pub mod pulse;
pub mod shift;

mod common;

pub use badge::BadgeRouter;
pub use locks::MachineLocks;
pub use machine::MachineService;
pub use maintenance::MaintenanceWorkflow;
pub use outcome::{
    CallSummary, DashboardStatus, OperationOutcome, PulseOutcome, ScanAction, ShiftSummary,
};
pub use pulse::PulseIngest;
pub use shift::ShiftLedger;
