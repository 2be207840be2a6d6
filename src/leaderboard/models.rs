use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

/// Aggregation window a score is ranked under.
///
/// Periods only namespace leaderboard scopes; resetting or archiving the
/// time-bounded boards happens elsewhere in the platform.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    #[default]
    AllTime,
}

/// Identifies one ranked scope: a game's metric within a period.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaderboardKey {
    pub game_name: String,
    pub metric: String,
    pub period: Period,
}

impl LeaderboardKey {
    pub fn new(game_name: &str, metric: &str, period: Period) -> Self {
        Self {
            game_name: game_name.to_string(),
            metric: metric.to_string(),
            period,
        }
    }

    /// Key under which this scope's sorted set lives, shared by all backends.
    pub fn storage_key(&self) -> String {
        format!("lb:{}:{}:{}", self.game_name, self.metric, self.period)
    }
}

impl fmt::Display for LeaderboardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.game_name, self.metric, self.period)
    }
}

/// One scored member of a scope, as the store reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub participant_id: String,
    pub score: f64,
    pub games_played: u32,
}

/// A single submitted measurement: one metric value, fanned out to `periods`.
///
/// An empty `periods` list means "use the ingestion service's defaults".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub metric: String,
    pub value: f64,
    #[serde(default)]
    pub periods: Vec<Period>,
}

impl ScoreSubmission {
    pub fn new(metric: &str, value: f64) -> Self {
        Self {
            metric: metric.to_string(),
            value,
            periods: Vec::new(),
        }
    }

    pub fn with_periods(metric: &str, value: f64, periods: Vec<Period>) -> Self {
        Self {
            metric: metric.to_string(),
            value,
            periods,
        }
    }
}

/// One row of a rendered leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub participant_id: String,
    pub display_name: String,
    pub score: f64,
    pub rank: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub games_played: Option<u32>,
}

/// One page of a leaderboard, best score first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardPage {
    pub game_name: String,
    pub metric: String,
    pub period: Period,
    pub entries: Vec<LeaderboardEntry>,
    pub total_items: u64,
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

/// A single participant's standing plus the entries ranked around them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRankDetail {
    pub participant_id: String,
    pub game_name: String,
    pub metric: String,
    pub period: Period,
    pub rank: u64,
    pub score: f64,
    pub surrounding: Vec<LeaderboardEntry>,
}
