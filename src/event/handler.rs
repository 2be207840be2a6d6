use async_trait::async_trait;
use thiserror::Error;

use super::events::PlatformEvent;

/// Errors that can occur when handling events
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Handler timed out")]
    Timeout,

    #[error("Retryable error: {0}")]
    Retryable(String),

    #[error("Non-retryable error: {0}")]
    NonRetryable(String),
}

impl EventError {
    /// Whether this error indicates the delivery should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, EventError::Retryable(_) | EventError::Timeout)
    }

    /// Create a retryable error
    pub fn retryable(msg: impl Into<String>) -> Self {
        EventError::Retryable(msg.into())
    }

    /// Create a non-retryable error
    pub fn non_retryable(msg: impl Into<String>) -> Self {
        EventError::NonRetryable(msg.into())
    }
}

/// Trait for components that react to platform events
///
/// Handlers are the reactive side of the leaderboard: the dispatcher feeds
/// them every event and they decide what is relevant.
///
/// Examples:
/// - ResultsRecorder: writes confirmed scores onto the leaderboards
/// - an audit handler: appends completion facts to a log
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle one event.
    ///
    /// Handlers should be idempotent where possible - the dispatcher retries
    /// retryable failures, so the same event can arrive more than once.
    async fn handle(&self, event: &PlatformEvent) -> Result<(), EventError>;

    /// Human-readable name for this handler (for logging/debugging)
    fn name(&self) -> &'static str;
}

/// A no-op event handler for testing
///
/// Does nothing; useful where a registered EventHandler is needed but its
/// behavior is irrelevant.
pub struct NoOpEventHandler;

#[async_trait]
impl EventHandler for NoOpEventHandler {
    async fn handle(&self, _event: &PlatformEvent) -> Result<(), EventError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "NoOpEventHandler"
    }
}
