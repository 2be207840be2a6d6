use tokio::time::{sleep, Duration};

use podium::{
    LeaderboardPage, ParticipantResult, Period, PlatformEvent, ScoreSubmission, UserRankDetail,
};

use super::setup::TestStack;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestStack {
    /// Submit one participant's chess scores straight into ingestion.
    pub async fn submit(
        &self,
        participant_id: &str,
        display_name: Option<&str>,
        scores: Vec<ScoreSubmission>,
    ) {
        self.ingestion
            .submit_scores(participant_id, display_name, "chess", &scores)
            .await
            .expect("submission should succeed");
    }

    /// Emit a completed match and wait for the dispatcher to process it.
    pub async fn emit_match(&self, results: Vec<ParticipantResult>) {
        self.event_bus.emit(PlatformEvent::MatchCompleted {
            match_id: "match-1".to_string(),
            game_name: "chess".to_string(),
            completed_at: chrono::Utc::now(),
            results,
        });
        sleep(Duration::from_millis(50)).await;
    }

    /// Fetch one page of the chess rating board.
    pub async fn page(&self, period: Period, page: u32, page_size: u32) -> LeaderboardPage {
        self.query
            .get_page("chess", "rating", period, page, page_size)
            .await
            .expect("page query should succeed")
    }

    /// Fetch a participant's all-time rating standing.
    pub async fn standing(&self, participant_id: &str, surrounding_count: u32) -> UserRankDetail {
        self.query
            .get_user_rank(
                participant_id,
                "chess",
                "rating",
                Period::AllTime,
                surrounding_count,
            )
            .await
            .expect("rank query should succeed")
    }
}

/// A one-metric participant result for completion events.
pub fn rating_result(
    participant_id: &str,
    display_name: Option<&str>,
    rating: f64,
) -> ParticipantResult {
    ParticipantResult {
        participant_id: participant_id.to_string(),
        display_name: display_name.map(|s| s.to_string()),
        scores: vec![ScoreSubmission::new("rating", rating)],
    }
}
