//! # lohia-database
//!
//! Persistence for the Lohia monitor.
//!
//! The PostgreSQL implementation ([`PostgresMonitorStore`]) composes the
//! per-entity repositories into the composite atomic writes the service
//! layer requires, locking the machine row (`SELECT ... FOR UPDATE`) for
//! the duration of each transaction. The in-memory implementation
//! ([`memory::MemoryMonitorStore`]) backs tests and single-node demos.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::{MemoryDirectory, MemoryMonitorStore};
pub use store::PostgresMonitorStore;
