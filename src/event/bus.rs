use tokio::sync::broadcast;
use tracing::debug;

use super::events::PlatformEvent;

const DEFAULT_CAPACITY: usize = 256;

/// Event bus for distributing completion events throughout the application
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Creates a new event bus buffering up to `capacity` undelivered events
    /// per subscriber. A slow subscriber past that lags and loses the oldest
    /// events.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Emits an event to all current subscribers.
    pub fn emit(&self, event: PlatformEvent) {
        let event_type = event.event_type();
        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(event_type, receivers = receiver_count, "Event emitted");
            }
            Err(_) => {
                debug!(event_type, "Event emitted with no receivers");
            }
        }
    }

    /// Subscribe to every event emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
