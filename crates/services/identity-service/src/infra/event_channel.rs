//! Process-wide identity event channel.
//!
//! Fans published events out to every subscriber over a tokio broadcast
//! channel. Publishing never blocks: a subscriber that falls more than
//! `capacity` events behind loses the oldest ones.

use domain::{DomainEventPublisher, IdentityEvent};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// In-process broadcast channel for identity events
#[derive(Debug)]
pub struct BroadcastEventChannel {
    sender: broadcast::Sender<IdentityEvent>,
}

impl BroadcastEventChannel {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IdentityEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl DomainEventPublisher for BroadcastEventChannel {
    fn publish(&self, event: IdentityEvent) {
        let event_type = event.event_type();
        // No subscribers is not an error for a fire-and-forget channel
        if self.sender.send(event).is_err() {
            debug!(event_type, "identity event published with no subscribers");
        }
    }
}

/// Log every event published on `channel` until it closes.
pub fn spawn_event_logger(channel: &BroadcastEventChannel) -> JoinHandle<()> {
    let mut receiver = channel.subscribe();

    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => info!(
                    event_type = event.event_type(),
                    tenant_id = %event.tenant_id(),
                    username = event.username(),
                    occurred_on = %event.occurred_on(),
                    "identity event"
                ),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event logger fell behind, events skipped")
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
