pub mod ingest;
pub mod query;

mod errors;
pub mod models;
#[cfg(feature = "redis")]
pub mod redis_store;
pub mod store;

pub use errors::LeaderboardError;
pub use ingest::{ResultsRecorder, ScoreIngestionService, ScoreIngestionServiceBuilder};
pub use models::*;
pub use query::LeaderboardQueryService;
#[cfg(feature = "redis")]
pub use redis_store::RedisScoreStore;
pub use store::{InMemoryScoreStore, ScoreStore, StoreError};
