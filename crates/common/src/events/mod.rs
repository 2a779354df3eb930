//! Session event bus
//!
//! Fan-out channel for [`SessionEvent`]s. Publishing never blocks and never
//! fails; with no subscribers the event is dropped.

use stakeadmin_domain::{SessionEvent, UnauthorizedDetail};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Cloneable handle to the session bus. Clones publish to the same channel.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    /// Create a bus buffering up to `capacity` undelivered events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Deliver `event` to every current subscriber; returns how many received it.
    pub fn publish(&self, event: SessionEvent) -> usize {
        let name = event.name();
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(event = name, receivers, "session event published");
                receivers
            }
            Err(_) => {
                debug!(event = name, "session event dropped, no subscribers");
                0
            }
        }
    }

    /// Broadcast `auth:unauthorized`
    pub fn notify_unauthorized(&self, detail: UnauthorizedDetail) -> usize {
        info!(
            status = detail.status,
            method = %detail.method,
            url = %detail.url,
            reason = %detail.reason,
            "session rejected by server"
        );
        self.publish(SessionEvent::Unauthorized(detail))
    }

    /// Broadcast `app:soft-refresh`
    pub fn request_soft_refresh(&self) -> usize {
        self.publish(SessionEvent::SoftRefresh)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new(stakeadmin_domain::constants::DEFAULT_EVENT_CAPACITY)
    }
}
