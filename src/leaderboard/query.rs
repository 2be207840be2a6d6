use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::errors::LeaderboardError;
use super::models::{
    LeaderboardEntry, LeaderboardKey, LeaderboardPage, Period, ScoreEntry, UserRankDetail,
};
use super::store::ScoreStore;
use crate::identity::{fallback_display_name, IdentityDirectory};

/// Service answering leaderboard read queries.
///
/// Rankings come from the score store; display names come from the identity
/// directory and degrade to synthesized fallbacks when the directory has no
/// answer.
pub struct LeaderboardQueryService {
    store: Arc<dyn ScoreStore>,
    directory: Arc<dyn IdentityDirectory>,
}

impl LeaderboardQueryService {
    pub fn new(store: Arc<dyn ScoreStore>, directory: Arc<dyn IdentityDirectory>) -> Self {
        Self { store, directory }
    }

    /// One page of a leaderboard, best score first.
    ///
    /// `page` is 1-based. An empty or unknown scope yields an empty page
    /// (`total_pages` = 1), not an error; a page past the end yields an
    /// empty entry list with the real totals.
    #[instrument(skip(self))]
    pub async fn get_page(
        &self,
        game_name: &str,
        metric: &str,
        period: Period,
        page: u32,
        page_size: u32,
    ) -> Result<LeaderboardPage, LeaderboardError> {
        validate_scope(game_name, metric)?;
        if page == 0 || page_size == 0 {
            return Err(LeaderboardError::InvalidInput(
                "page and page_size must be at least 1".to_string(),
            ));
        }

        let key = LeaderboardKey::new(game_name, metric, period);
        let total_items = self.store.count(&key).await?;

        if total_items == 0 {
            debug!(key = %key, "Leaderboard scope is empty");
            return Ok(LeaderboardPage {
                game_name: game_name.to_string(),
                metric: metric.to_string(),
                period,
                entries: Vec::new(),
                total_items: 0,
                current_page: page,
                page_size,
                total_pages: 1,
            });
        }

        let start_rank = (page as u64 - 1) * page_size as u64;
        let end_rank = start_rank + page_size as u64 - 1;
        let scored = self
            .store
            .range_by_rank_descending(&key, start_rank, end_rank)
            .await?;
        let entries = self.ranked_entries(scored, start_rank).await;

        info!(
            key = %key,
            page,
            returned = entries.len(),
            total_items,
            "Leaderboard page assembled"
        );

        Ok(LeaderboardPage {
            game_name: game_name.to_string(),
            metric: metric.to_string(),
            period,
            entries,
            total_items,
            current_page: page,
            page_size,
            total_pages: (total_items + page_size as u64 - 1) / page_size as u64,
        })
    }

    /// A participant's standing plus up to `surrounding_count` neighbors on
    /// each side.
    ///
    /// The window is anchored on the participant and clamped by the board's
    /// edges, never re-centered, so the best player sees themselves first.
    /// Rank and score are read in one snapshot; the surrounding entries are a
    /// best-effort follow-up read.
    #[instrument(skip(self))]
    pub async fn get_user_rank(
        &self,
        participant_id: &str,
        game_name: &str,
        metric: &str,
        period: Period,
        surrounding_count: u32,
    ) -> Result<UserRankDetail, LeaderboardError> {
        validate_scope(game_name, metric)?;
        if participant_id.trim().is_empty() {
            return Err(LeaderboardError::InvalidInput(
                "participant_id must not be blank".to_string(),
            ));
        }

        let key = LeaderboardKey::new(game_name, metric, period);
        let (rank0, entry) = self
            .store
            .rank_and_score(&key, participant_id)
            .await?
            .ok_or_else(|| LeaderboardError::NotFound {
                participant_id: participant_id.to_string(),
                key: key.clone(),
            })?;

        let start_rank = rank0.saturating_sub(surrounding_count as u64);
        let end_rank = rank0 + surrounding_count as u64;
        let scored = self
            .store
            .range_by_rank_descending(&key, start_rank, end_rank)
            .await?;
        let surrounding = self.ranked_entries(scored, start_rank).await;

        debug!(
            key = %key,
            participant_id = %participant_id,
            rank = rank0 + 1,
            window = surrounding.len(),
            "User rank resolved"
        );

        Ok(UserRankDetail {
            participant_id: participant_id.to_string(),
            game_name: game_name.to_string(),
            metric: metric.to_string(),
            period,
            rank: rank0 + 1,
            score: entry.score,
            surrounding,
        })
    }

    /// Joins store entries with display names. A directory outage, or a batch
    /// that breaks the positional contract, degrades every name to its
    /// fallback rather than failing or shrinking the page.
    async fn ranked_entries(
        &self,
        scored: Vec<ScoreEntry>,
        start_rank: u64,
    ) -> Vec<LeaderboardEntry> {
        let ids: Vec<String> = scored
            .iter()
            .map(|entry| entry.participant_id.clone())
            .collect();
        let names = match self.directory.display_names(&ids).await {
            Ok(names) if names.len() == scored.len() => names,
            Ok(names) => {
                warn!(
                    expected = scored.len(),
                    returned = names.len(),
                    "Display name batch misaligned, using fallbacks"
                );
                vec![None; scored.len()]
            }
            Err(err) => {
                warn!(error = %err, "Display name lookup failed, using fallbacks");
                vec![None; scored.len()]
            }
        };

        scored
            .into_iter()
            .zip(names)
            .enumerate()
            .map(|(offset, (entry, name))| LeaderboardEntry {
                display_name: name
                    .unwrap_or_else(|| fallback_display_name(&entry.participant_id)),
                rank: start_rank + offset as u64 + 1,
                score: entry.score,
                games_played: Some(entry.games_played),
                participant_id: entry.participant_id,
            })
            .collect()
    }
}

fn validate_scope(game_name: &str, metric: &str) -> Result<(), LeaderboardError> {
    if game_name.trim().is_empty() {
        return Err(LeaderboardError::InvalidInput(
            "game_name must not be blank".to_string(),
        ));
    }
    if metric.trim().is_empty() {
        return Err(LeaderboardError::InvalidInput(
            "metric must not be blank".to_string(),
        ));
    }
    Ok(())
}
