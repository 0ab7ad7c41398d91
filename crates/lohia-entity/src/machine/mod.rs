//! Machine aggregate: one record per physical production line.

pub mod gearing;
pub mod model;
pub mod snapshot;
pub mod status;

pub use gearing::Gearing;
pub use model::Machine;
pub use snapshot::MachineSnapshot;
pub use status::MachineStatus;
