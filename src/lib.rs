// Library crate for the tournament platform's leaderboard core
// This file exposes the public API for hosts and integration tests

pub mod event;
pub mod identity;
pub mod leaderboard;

// Re-export commonly used types for easier access in hosting code and tests
pub use event::{EventBus, EventDispatcher, EventHandler, ParticipantResult, PlatformEvent};
pub use identity::{IdentityDirectory, InMemoryIdentityDirectory};
pub use leaderboard::{
    InMemoryScoreStore, LeaderboardError, LeaderboardKey, LeaderboardPage, LeaderboardQueryService,
    Period, ResultsRecorder, ScoreIngestionService, ScoreStore, ScoreSubmission, UserRankDetail,
};
