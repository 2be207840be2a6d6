use async_trait::async_trait;
use deadpool_redis::redis::{self, AsyncCommands};
use deadpool_redis::Pool;
use tracing::{instrument, warn};

use super::models::{LeaderboardKey, ScoreEntry};
use super::store::{ScoreStore, StoreError};

/// Score store backed by Redis sorted sets, one per scope.
///
/// Each scope keeps a ZSET at `lb:{game}:{metric}:{period}` and a companion
/// hash at the same key suffixed `:games` counting upserts per participant.
///
/// Redis orders equal scores by reverse member order under ZREV* reads, the
/// one place this backend deviates from the in-memory tie-break (ascending
/// participant id). Ranks stay deterministic either way.
pub struct RedisScoreStore {
    pool: Pool,
}

impl RedisScoreStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn connection(&self) -> Result<deadpool_redis::Connection, StoreError> {
        self.pool.get().await.map_err(|e| {
            warn!(error = %e, "Redis connection checkout failed");
            StoreError::Unavailable(e.to_string())
        })
    }

    fn games_key(key: &LeaderboardKey) -> String {
        format!("{}:games", key.storage_key())
    }
}

fn command_error(err: redis::RedisError) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

#[async_trait]
impl ScoreStore for RedisScoreStore {
    #[instrument(skip(self))]
    async fn upsert(
        &self,
        key: &LeaderboardKey,
        participant_id: &str,
        score: f64,
    ) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;

        // Score and games-played move together in one transaction.
        let mut pipe = redis::pipe();
        let pipe = pipe.atomic();
        pipe.zadd(key.storage_key(), participant_id, score);
        pipe.hincr(Self::games_key(key), participant_id, 1);
        let _: () = pipe.query_async(&mut conn).await.map_err(command_error)?;
        Ok(())
    }

    async fn count(&self, key: &LeaderboardKey) -> Result<u64, StoreError> {
        let mut conn = self.connection().await?;
        let count: u64 = conn
            .zcard(key.storage_key())
            .await
            .map_err(command_error)?;
        Ok(count)
    }

    async fn range_by_rank_descending(
        &self,
        key: &LeaderboardKey,
        start_rank: u64,
        end_rank: u64,
    ) -> Result<Vec<ScoreEntry>, StoreError> {
        if start_rank > end_rank {
            return Ok(Vec::new());
        }
        let mut conn = self.connection().await?;

        let scored: Vec<(String, f64)> = conn
            .zrevrange_withscores(key.storage_key(), start_rank as isize, end_rank as isize)
            .await
            .map_err(command_error)?;
        if scored.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = scored.iter().map(|(id, _)| id.clone()).collect();
        let counts: Vec<Option<u32>> = redis::cmd("HMGET")
            .arg(Self::games_key(key))
            .arg(&ids)
            .query_async(&mut conn)
            .await
            .map_err(command_error)?;

        Ok(scored
            .into_iter()
            .zip(counts)
            .map(|((participant_id, score), games)| ScoreEntry {
                participant_id,
                score,
                games_played: games.unwrap_or(0),
            })
            .collect())
    }

    async fn rank_of(
        &self,
        key: &LeaderboardKey,
        participant_id: &str,
    ) -> Result<Option<u64>, StoreError> {
        let mut conn = self.connection().await?;
        let rank: Option<u64> = conn
            .zrevrank(key.storage_key(), participant_id)
            .await
            .map_err(command_error)?;
        Ok(rank)
    }

    async fn score_of(
        &self,
        key: &LeaderboardKey,
        participant_id: &str,
    ) -> Result<Option<f64>, StoreError> {
        let mut conn = self.connection().await?;
        let score: Option<f64> = conn
            .zscore(key.storage_key(), participant_id)
            .await
            .map_err(command_error)?;
        Ok(score)
    }

    async fn rank_and_score(
        &self,
        key: &LeaderboardKey,
        participant_id: &str,
    ) -> Result<Option<(u64, ScoreEntry)>, StoreError> {
        let mut conn = self.connection().await?;

        // One transaction, one snapshot.
        let mut pipe = redis::pipe();
        let pipe = pipe.atomic();
        pipe.zrevrank(key.storage_key(), participant_id);
        pipe.zscore(key.storage_key(), participant_id);
        pipe.hget(Self::games_key(key), participant_id);
        let (rank, score, games): (Option<u64>, Option<f64>, Option<u32>) =
            pipe.query_async(&mut conn).await.map_err(command_error)?;

        match (rank, score) {
            (Some(rank), Some(score)) => Ok(Some((
                rank,
                ScoreEntry {
                    participant_id: participant_id.to_string(),
                    score,
                    games_played: games.unwrap_or(0),
                },
            ))),
            _ => Ok(None),
        }
    }
}
