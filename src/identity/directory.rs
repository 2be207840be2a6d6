use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Display-name cache keyed by participant id.
///
/// The directory is a denormalized copy of whatever identity the rest of the
/// platform knows; it exists so leaderboard reads never have to join against
/// a user service. Names are global (not per-game) and last write wins, so a
/// rename is picked up by the next submission that carries it.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Upserts the display name for a participant.
    async fn set_display_name(
        &self,
        participant_id: &str,
        display_name: &str,
    ) -> Result<(), DirectoryError>;

    /// Cached display name for a participant, if any.
    async fn display_name(&self, participant_id: &str) -> Result<Option<String>, DirectoryError>;

    /// Batch lookup, positionally aligned with `participant_ids`.
    ///
    /// Backends with a native multi-get override this; the default loops
    /// single lookups.
    async fn display_names(
        &self,
        participant_ids: &[String],
    ) -> Result<Vec<Option<String>>, DirectoryError> {
        let mut names = Vec::with_capacity(participant_ids.len());
        for participant_id in participant_ids {
            names.push(self.display_name(participant_id).await?);
        }
        Ok(names)
    }
}

/// Lookup seam for an external identity provider.
///
/// Consulted by the ingestion service when a submission carries no display
/// name, before falling back to a synthesized one.
#[async_trait]
pub trait DisplayNameSource: Send + Sync {
    async fn lookup(&self, participant_id: &str) -> Result<Option<String>, DirectoryError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectoryError {
    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

/// Deterministic name for participants nobody has named yet.
///
/// Derived from the participant id so repeated renders of the same board
/// agree with each other.
pub fn fallback_display_name(participant_id: &str) -> String {
    let prefix: String = participant_id.chars().take(8).collect();
    format!("player-{}", prefix)
}

/// In-memory implementation of IdentityDirectory
/// Uses RwLock for concurrent access with read optimization
pub struct InMemoryIdentityDirectory {
    names: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryIdentityDirectory {
    pub fn new() -> Self {
        Self {
            names: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryIdentityDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryIdentityDirectory {
    async fn set_display_name(
        &self,
        participant_id: &str,
        display_name: &str,
    ) -> Result<(), DirectoryError> {
        let mut names = self.names.write().await;
        names.insert(participant_id.to_string(), display_name.to_string());

        debug!(
            participant_id = %participant_id,
            display_name = %display_name,
            "Cached display name"
        );

        Ok(())
    }

    async fn display_name(&self, participant_id: &str) -> Result<Option<String>, DirectoryError> {
        let names = self.names.read().await;
        Ok(names.get(participant_id).cloned())
    }
}
