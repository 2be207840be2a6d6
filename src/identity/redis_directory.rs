use async_trait::async_trait;
use deadpool_redis::redis::{self, AsyncCommands};
use deadpool_redis::Pool;
use tracing::warn;

use super::directory::{DirectoryError, IdentityDirectory};

/// Hash holding every participant's display name, keyed by participant id.
const NAMES_KEY: &str = "lb:names";

/// Identity directory backed by a single Redis hash.
pub struct RedisIdentityDirectory {
    pool: Pool,
}

impl RedisIdentityDirectory {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn connection(&self) -> Result<deadpool_redis::Connection, DirectoryError> {
        self.pool.get().await.map_err(|e| {
            warn!(error = %e, "Redis connection checkout failed");
            DirectoryError::Unavailable(e.to_string())
        })
    }
}

fn command_error(err: redis::RedisError) -> DirectoryError {
    DirectoryError::Unavailable(err.to_string())
}

#[async_trait]
impl IdentityDirectory for RedisIdentityDirectory {
    async fn set_display_name(
        &self,
        participant_id: &str,
        display_name: &str,
    ) -> Result<(), DirectoryError> {
        let mut conn = self.connection().await?;
        let _: () = conn
            .hset(NAMES_KEY, participant_id, display_name)
            .await
            .map_err(command_error)?;
        Ok(())
    }

    async fn display_name(&self, participant_id: &str) -> Result<Option<String>, DirectoryError> {
        let mut conn = self.connection().await?;
        conn.hget(NAMES_KEY, participant_id)
            .await
            .map_err(command_error)
    }

    // One HMGET instead of the default per-id loop.
    async fn display_names(
        &self,
        participant_ids: &[String],
    ) -> Result<Vec<Option<String>>, DirectoryError> {
        if participant_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.connection().await?;
        redis::cmd("HMGET")
            .arg(NAMES_KEY)
            .arg(participant_ids)
            .query_async(&mut conn)
            .await
            .map_err(command_error)
    }
}
