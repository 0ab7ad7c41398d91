//! Outbound notification hook for dashboard updates.

use async_trait::async_trait;

use crate::events::DomainEvent;

/// Hook called after any state-mutating operation commits.
///
/// Delivery is fire-and-forget: implementations must not fail the calling
/// operation, and slow consumers must not block it. On a rejected operation
/// nothing is emitted, so dashboards simply see no update that cycle.
#[async_trait]
pub trait ChangeNotifier: Send + Sync + 'static {
    /// Relay a committed machine change to interested dashboards.
    async fn machine_changed(&self, event: DomainEvent);
}

/// A notifier that drops every event.
///
/// Used by tests and batch tooling that do not care about fan-out.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

#[async_trait]
impl ChangeNotifier for NullNotifier {
    async fn machine_changed(&self, _event: DomainEvent) {}
}
