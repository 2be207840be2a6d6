use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::leaderboard::ScoreSubmission;

/// Completion events flowing out of the tournament platform.
///
/// Events are facts about play that has already been confirmed. The
/// leaderboard reacts to them instead of being called directly by match and
/// tournament code, so result producers stay decoupled from ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlatformEvent {
    /// A match finished and its results were confirmed.
    MatchCompleted {
        match_id: String,
        game_name: String,
        completed_at: DateTime<Utc>,
        results: Vec<ParticipantResult>,
    },

    /// A tournament reached its completed state and published standings.
    TournamentCompleted {
        tournament_id: String,
        game_name: String,
        completed_at: DateTime<Utc>,
        results: Vec<ParticipantResult>,
    },
}

/// One participant's confirmed scores within a completion event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantResult {
    pub participant_id: String,
    pub display_name: Option<String>,
    pub scores: Vec<ScoreSubmission>,
}

impl PlatformEvent {
    /// The game the results belong to.
    pub fn game_name(&self) -> &str {
        match self {
            PlatformEvent::MatchCompleted { game_name, .. } => game_name,
            PlatformEvent::TournamentCompleted { game_name, .. } => game_name,
        }
    }

    /// Per-participant results carried by the event.
    pub fn results(&self) -> &[ParticipantResult] {
        match self {
            PlatformEvent::MatchCompleted { results, .. } => results,
            PlatformEvent::TournamentCompleted { results, .. } => results,
        }
    }

    /// Id of the match or tournament that produced the event.
    pub fn source_id(&self) -> &str {
        match self {
            PlatformEvent::MatchCompleted { match_id, .. } => match_id,
            PlatformEvent::TournamentCompleted { tournament_id, .. } => tournament_id,
        }
    }

    /// Human-readable event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            PlatformEvent::MatchCompleted { .. } => "match_completed",
            PlatformEvent::TournamentCompleted { .. } => "tournament_completed",
        }
    }
}
