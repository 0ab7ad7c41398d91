//! Per-entity repository implementations.

pub mod employee;
pub mod machine;
pub mod maintenance;
pub mod pulse_log;
pub mod shift;

pub use employee::PgEmployeeDirectory;
pub use machine::MachineRepository;
pub use maintenance::MaintenanceCallRepository;
pub use pulse_log::PulseLogRepository;
pub use shift::ShiftRepository;
