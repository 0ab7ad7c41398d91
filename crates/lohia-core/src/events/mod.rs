//! Domain events emitted by monitor operations.
//!
//! Events are handed to the [`ChangeNotifier`](crate::traits::ChangeNotifier)
//! after a state-mutating operation commits; the dashboard fan-out layer
//! relays them to live views. The core has no knowledge of the transport.

pub mod machine;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use machine::MachineEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The employee who caused the event (if applicable).
    pub actor_id: Option<Uuid>,
    /// The event payload.
    pub payload: MachineEvent,
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: Option<Uuid>, payload: MachineEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }

    /// The machine this event concerns.
    pub fn machine_id(&self) -> Uuid {
        self.payload.machine_id()
    }
}
