//! Slim employee record consumed from the staff directory.

pub mod model;
pub mod role;

pub use model::Employee;
pub use role::EmployeeRole;
