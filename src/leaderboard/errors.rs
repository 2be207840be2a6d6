use thiserror::Error;

use super::models::LeaderboardKey;
use super::store::StoreError;

/// Errors surfaced by the leaderboard query and ingestion services.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// Caller-supplied arguments were rejected before any store call.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The participant has no entry in the requested scope.
    #[error("No entry for participant {participant_id} in {key}")]
    NotFound {
        participant_id: String,
        key: LeaderboardKey,
    },

    /// The backing score store could not be reached.
    #[error("Score store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl LeaderboardError {
    /// True when retrying the same call later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LeaderboardError::StoreUnavailable(_))
    }
}
