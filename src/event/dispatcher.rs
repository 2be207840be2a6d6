use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::{
    bus::EventBus,
    events::PlatformEvent,
    handler::{EventError, EventHandler},
};

/// Coordinates event distribution between the event bus and event handlers
///
/// The EventDispatcher:
/// - Listens for events from the EventBus
/// - Routes events to the registered handlers
/// - Handles retries and error recovery
/// - Provides isolation between handlers (one failing handler doesn't affect others)
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
    event_bus: EventBus,
    handler_timeout: Duration,
    max_retries: u32,
}

impl EventDispatcher {
    /// Create a new event dispatcher
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            handlers: Vec::new(),
            event_bus,
            handler_timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }

    /// Add an event handler to the dispatcher
    ///
    /// The handler will start receiving events once `start_listening` is called.
    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        info!(handler_name = handler.name(), "Registering event handler");
        self.handlers.push(handler);
    }

    /// Set the timeout for individual handler execution
    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = timeout;
        self
    }

    /// Set the maximum number of retries for failed handlers
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Start listening for events and dispatching them to handlers
    ///
    /// This spawns a background task that runs until the EventBus is dropped.
    pub async fn start_listening(self) {
        let handlers = self.handlers;
        let mut receiver = self.event_bus.subscribe();
        let handler_timeout = self.handler_timeout;
        let max_retries = self.max_retries;

        info!(
            handler_count = handlers.len(),
            timeout_secs = handler_timeout.as_secs(),
            max_retries = max_retries,
            "Starting event dispatcher"
        );

        tokio::spawn(async move {
            while let Ok(event) = receiver.recv().await {
                debug!(
                    event_type = event.event_type(),
                    source_id = event.source_id(),
                    "Dispatching event to {} handlers",
                    handlers.len()
                );

                // Process each handler independently
                for handler in &handlers {
                    let event = event.clone();
                    let handler = handler.clone();
                    let timeout_duration = handler_timeout;

                    // Spawn each handler in its own task for isolation
                    tokio::spawn(async move {
                        if let Err(e) =
                            Self::handle_with_retry(handler, event, timeout_duration, max_retries)
                                .await
                        {
                            error!(error = ?e, "Handler failed permanently");
                        }
                    });
                }
            }

            info!("Event dispatcher stopped listening");
        });
    }

    /// Handle an event with retry logic and timeout
    async fn handle_with_retry(
        handler: Arc<dyn EventHandler>,
        event: PlatformEvent,
        handler_timeout: Duration,
        max_retries: u32,
    ) -> Result<(), EventError> {
        let handler_name = handler.name();
        let event_type = event.event_type();
        let source_id = event.source_id().to_string();

        for attempt in 0..=max_retries {
            match timeout(handler_timeout, handler.handle(&event)).await {
                Ok(Ok(())) => {
                    if attempt > 0 {
                        info!(
                            handler = handler_name,
                            event_type = event_type,
                            source_id = %source_id,
                            attempt = attempt + 1,
                            "Handler succeeded after retry"
                        );
                    }
                    return Ok(());
                }
                Ok(Err(e)) if e.is_retryable() && attempt < max_retries => {
                    warn!(
                        handler = handler_name,
                        event_type = event_type,
                        source_id = %source_id,
                        attempt = attempt + 1,
                        error = ?e,
                        "Handler failed, will retry"
                    );

                    // Exponential backoff
                    let delay = Duration::from_millis(100 * 2_u64.pow(attempt));
                    tokio::time::sleep(delay).await;
                }
                Ok(Err(e)) => {
                    error!(
                        handler = handler_name,
                        event_type = event_type,
                        source_id = %source_id,
                        attempt = attempt + 1,
                        error = ?e,
                        "Handler failed permanently"
                    );
                    return Err(e);
                }
                Err(_timeout) => {
                    if attempt < max_retries {
                        warn!(
                            handler = handler_name,
                            event_type = event_type,
                            source_id = %source_id,
                            attempt = attempt + 1,
                            "Handler timed out, will retry"
                        );
                        continue;
                    } else {
                        error!(
                            handler = handler_name,
                            event_type = event_type,
                            source_id = %source_id,
                            "Handler timed out permanently"
                        );
                        return Err(EventError::Timeout);
                    }
                }
            }
        }

        unreachable!("Loop should have returned by now");
    }
}
