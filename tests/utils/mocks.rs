use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use podium::identity::{DirectoryError, DisplayNameSource};
use podium::leaderboard::{InMemoryScoreStore, LeaderboardKey, ScoreEntry, ScoreStore, StoreError};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// In-memory score store that can be told to refuse the next writes.
pub struct MockScoreStore {
    inner: InMemoryScoreStore,
    failing_upserts: AtomicU32,
    upsert_calls: AtomicU32,
}

impl MockScoreStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryScoreStore::new(),
            failing_upserts: AtomicU32::new(0),
            upsert_calls: AtomicU32::new(0),
        }
    }

    /// Make the next `count` upsert calls fail as a store outage.
    pub fn fail_next_upserts(&self, count: u32) {
        self.failing_upserts.store(count, Ordering::SeqCst);
    }

    pub fn upsert_calls(&self) -> u32 {
        self.upsert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoreStore for MockScoreStore {
    async fn upsert(
        &self,
        key: &LeaderboardKey,
        participant_id: &str,
        score: f64,
    ) -> Result<(), StoreError> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        let outage_armed = self
            .failing_upserts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if outage_armed {
            return Err(StoreError::Unavailable("injected outage".to_string()));
        }
        self.inner.upsert(key, participant_id, score).await
    }

    async fn count(&self, key: &LeaderboardKey) -> Result<u64, StoreError> {
        self.inner.count(key).await
    }

    async fn range_by_rank_descending(
        &self,
        key: &LeaderboardKey,
        start_rank: u64,
        end_rank: u64,
    ) -> Result<Vec<ScoreEntry>, StoreError> {
        self.inner
            .range_by_rank_descending(key, start_rank, end_rank)
            .await
    }

    async fn rank_of(
        &self,
        key: &LeaderboardKey,
        participant_id: &str,
    ) -> Result<Option<u64>, StoreError> {
        self.inner.rank_of(key, participant_id).await
    }

    async fn score_of(
        &self,
        key: &LeaderboardKey,
        participant_id: &str,
    ) -> Result<Option<f64>, StoreError> {
        self.inner.score_of(key, participant_id).await
    }

    async fn rank_and_score(
        &self,
        key: &LeaderboardKey,
        participant_id: &str,
    ) -> Result<Option<(u64, ScoreEntry)>, StoreError> {
        self.inner.rank_and_score(key, participant_id).await
    }
}

/// Identity source answering from a fixed table.
pub struct StaticNameSource {
    names: HashMap<String, String>,
}

impl StaticNameSource {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self {
            names: entries.into_iter().collect(),
        }
    }
}

#[async_trait]
impl DisplayNameSource for StaticNameSource {
    async fn lookup(&self, participant_id: &str) -> Result<Option<String>, DirectoryError> {
        Ok(self.names.get(participant_id).cloned())
    }
}
