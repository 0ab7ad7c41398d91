//! Per-machine broadcast channels for domain events.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use lohia_core::config::RealtimeConfig;
use lohia_core::events::DomainEvent;
use lohia_core::traits::ChangeNotifier;

/// Fan-out hub for machine change events.
///
/// Each machine gets its own lagging broadcast channel, created lazily on
/// first subscription and dropped again when its last subscriber goes
/// away; a separate floor-wide channel carries every event. Slow
/// subscribers lag and skip rather than block the publisher.
#[derive(Debug)]
pub struct MachineChannelHub {
    channels: DashMap<Uuid, broadcast::Sender<DomainEvent>>,
    floor: broadcast::Sender<DomainEvent>,
    buffer: usize,
}

impl MachineChannelHub {
    /// Create a hub with the configured channel buffer.
    pub fn new(config: &RealtimeConfig) -> Self {
        let (floor, _) = broadcast::channel(config.channel_buffer);
        Self {
            channels: DashMap::new(),
            floor,
            buffer: config.channel_buffer,
        }
    }

    /// Subscribe to one machine's events.
    pub fn subscribe(&self, machine_id: Uuid) -> broadcast::Receiver<DomainEvent> {
        self.channels
            .entry(machine_id)
            .or_insert_with(|| broadcast::channel(self.buffer).0)
            .subscribe()
    }

    /// Subscribe to every machine's events.
    pub fn subscribe_all(&self) -> broadcast::Receiver<DomainEvent> {
        self.floor.subscribe()
    }

    /// Number of machines with at least one live channel.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    fn publish(&self, event: DomainEvent) {
        let machine_id = event.machine_id();

        if let Some(sender) = self.channels.get(&machine_id) {
            if sender.send(event.clone()).is_err() {
                // last subscriber left; drop the idle channel
                drop(sender);
                self.channels
                    .remove_if(&machine_id, |_, s| s.receiver_count() == 0);
            }
        }
        if self.floor.send(event).is_err() {
            debug!(machine_id = %machine_id, "event published with no floor subscribers");
        }
    }
}

#[async_trait]
impl ChangeNotifier for MachineChannelHub {
    async fn machine_changed(&self, event: DomainEvent) {
        self.publish(event);
    }
}
