use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::models::{LeaderboardKey, ScoreEntry};

/// Error raised by score store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Ordered per-scope score index.
///
/// Members rank by descending score; equal scores order by ascending
/// participant id. A scope nobody has written to behaves exactly like an
/// empty one, so no read errors on unknown scopes.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Inserts or replaces the participant's score in the scope.
    ///
    /// `score` is the new absolute value, never a delta. Re-upserting the
    /// same participant moves their entry instead of duplicating it.
    async fn upsert(
        &self,
        key: &LeaderboardKey,
        participant_id: &str,
        score: f64,
    ) -> Result<(), StoreError>;

    /// Number of ranked members in the scope.
    async fn count(&self, key: &LeaderboardKey) -> Result<u64, StoreError>;

    /// Members in the inclusive 0-based rank window `[start_rank, end_rank]`,
    /// best score first. Windows past the end or inverted yield an empty vec.
    async fn range_by_rank_descending(
        &self,
        key: &LeaderboardKey,
        start_rank: u64,
        end_rank: u64,
    ) -> Result<Vec<ScoreEntry>, StoreError>;

    /// 0-based rank of the participant, if ranked.
    async fn rank_of(
        &self,
        key: &LeaderboardKey,
        participant_id: &str,
    ) -> Result<Option<u64>, StoreError>;

    /// Current score of the participant, if ranked.
    async fn score_of(
        &self,
        key: &LeaderboardKey,
        participant_id: &str,
    ) -> Result<Option<f64>, StoreError>;

    /// Rank and full entry read from one consistent snapshot.
    async fn rank_and_score(
        &self,
        key: &LeaderboardKey,
        participant_id: &str,
    ) -> Result<Option<(u64, ScoreEntry)>, StoreError>;
}

/// Index key ordering: higher scores first, ties by ascending participant id.
///
/// Scores compare via IEEE total ordering, so the index stays deterministic
/// for every float the callers let through.
#[derive(Debug, Clone)]
struct SortKey {
    score: f64,
    participant_id: String,
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.participant_id.cmp(&other.participant_id))
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

#[derive(Debug, Default)]
struct MemberRecord {
    score: f64,
    games_played: u32,
}

#[derive(Debug, Default)]
struct Scoreboard {
    members: HashMap<String, MemberRecord>,
    ordered: BTreeSet<SortKey>,
}

impl Scoreboard {
    fn upsert(&mut self, participant_id: &str, score: f64) {
        if let Some(record) = self.members.get_mut(participant_id) {
            self.ordered.remove(&SortKey {
                score: record.score,
                participant_id: participant_id.to_string(),
            });
            record.score = score;
            record.games_played += 1;
        } else {
            self.members.insert(
                participant_id.to_string(),
                MemberRecord {
                    score,
                    games_played: 1,
                },
            );
        }
        self.ordered.insert(SortKey {
            score,
            participant_id: participant_id.to_string(),
        });
    }

    fn entry(&self, participant_id: &str) -> Option<ScoreEntry> {
        self.members.get(participant_id).map(|record| ScoreEntry {
            participant_id: participant_id.to_string(),
            score: record.score,
            games_played: record.games_played,
        })
    }

    fn rank_of(&self, participant_id: &str) -> Option<u64> {
        if !self.members.contains_key(participant_id) {
            return None;
        }
        self.ordered
            .iter()
            .position(|key| key.participant_id == participant_id)
            .map(|index| index as u64)
    }

    fn window(&self, start_rank: u64, end_rank: u64) -> Vec<ScoreEntry> {
        if start_rank > end_rank {
            return Vec::new();
        }
        let take = (end_rank - start_rank + 1) as usize;
        self.ordered
            .iter()
            .skip(start_rank as usize)
            .take(take)
            .map(|key| ScoreEntry {
                participant_id: key.participant_id.clone(),
                score: key.score,
                games_played: self
                    .members
                    .get(&key.participant_id)
                    .map(|record| record.games_played)
                    .unwrap_or(0),
            })
            .collect()
    }
}

/// In-memory score store for development and testing.
///
/// Keeps one ordered index per scope. Rank lookups walk the index linearly,
/// which is fine at test sizes; production deployments use the Redis backend.
#[derive(Debug, Default)]
pub struct InMemoryScoreStore {
    boards: Arc<RwLock<HashMap<LeaderboardKey, Scoreboard>>>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self {
            boards: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ScoreStore for InMemoryScoreStore {
    #[instrument(skip(self))]
    async fn upsert(
        &self,
        key: &LeaderboardKey,
        participant_id: &str,
        score: f64,
    ) -> Result<(), StoreError> {
        let mut boards = self.boards.write().await;
        let board = boards.entry(key.clone()).or_default();
        board.upsert(participant_id, score);
        debug!(key = %key, participant_id = %participant_id, score, "Score upserted");
        Ok(())
    }

    async fn count(&self, key: &LeaderboardKey) -> Result<u64, StoreError> {
        let boards = self.boards.read().await;
        Ok(boards
            .get(key)
            .map(|board| board.members.len() as u64)
            .unwrap_or(0))
    }

    async fn range_by_rank_descending(
        &self,
        key: &LeaderboardKey,
        start_rank: u64,
        end_rank: u64,
    ) -> Result<Vec<ScoreEntry>, StoreError> {
        let boards = self.boards.read().await;
        Ok(boards
            .get(key)
            .map(|board| board.window(start_rank, end_rank))
            .unwrap_or_default())
    }

    async fn rank_of(
        &self,
        key: &LeaderboardKey,
        participant_id: &str,
    ) -> Result<Option<u64>, StoreError> {
        let boards = self.boards.read().await;
        Ok(boards.get(key).and_then(|board| board.rank_of(participant_id)))
    }

    async fn score_of(
        &self,
        key: &LeaderboardKey,
        participant_id: &str,
    ) -> Result<Option<f64>, StoreError> {
        let boards = self.boards.read().await;
        Ok(boards
            .get(key)
            .and_then(|board| board.members.get(participant_id))
            .map(|record| record.score))
    }

    async fn rank_and_score(
        &self,
        key: &LeaderboardKey,
        participant_id: &str,
    ) -> Result<Option<(u64, ScoreEntry)>, StoreError> {
        // Single read guard keeps rank and score from the same snapshot.
        let boards = self.boards.read().await;
        let board = match boards.get(key) {
            Some(board) => board,
            None => return Ok(None),
        };
        let rank = match board.rank_of(participant_id) {
            Some(rank) => rank,
            None => return Ok(None),
        };
        Ok(board.entry(participant_id).map(|entry| (rank, entry)))
    }
}
