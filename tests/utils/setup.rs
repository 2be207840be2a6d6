use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use podium::{
    EventBus, EventDispatcher, InMemoryIdentityDirectory, LeaderboardQueryService, Period,
    ResultsRecorder, ScoreIngestionService,
};

use super::mocks::{MockScoreStore, StaticNameSource};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestStack {
    pub event_bus: EventBus,
    pub store: Arc<MockScoreStore>,
    pub directory: Arc<InMemoryIdentityDirectory>,
    pub ingestion: Arc<ScoreIngestionService>,
    pub query: LeaderboardQueryService,
}

pub struct TestStackBuilder {
    default_periods: Vec<Period>,
    known_names: Vec<(String, String)>,
}

impl TestStackBuilder {
    pub fn new() -> Self {
        Self {
            default_periods: vec![],
            known_names: vec![],
        }
    }

    pub fn with_default_periods(mut self, periods: Vec<Period>) -> Self {
        self.default_periods = periods;
        self
    }

    /// Teach the identity source one participant's display name.
    pub fn with_known_name(mut self, participant_id: &str, display_name: &str) -> Self {
        self.known_names
            .push((participant_id.to_string(), display_name.to_string()));
        self
    }

    pub async fn build(self) -> TestStack {
        init_tracing();

        let event_bus = EventBus::with_default_capacity();
        let store = Arc::new(MockScoreStore::new());
        let directory = Arc::new(InMemoryIdentityDirectory::new());

        let mut builder = ScoreIngestionService::builder(store.clone(), directory.clone());
        if !self.known_names.is_empty() {
            builder = builder.with_identity_source(Arc::new(StaticNameSource::new(self.known_names)));
        }
        if !self.default_periods.is_empty() {
            builder = builder.with_default_periods(self.default_periods);
        }
        let ingestion = Arc::new(builder.build());

        let query = LeaderboardQueryService::new(store.clone(), directory.clone());

        // Completion events flow through the dispatcher into ingestion.
        let mut dispatcher =
            EventDispatcher::new(event_bus.clone()).with_handler_timeout(Duration::from_secs(2));
        dispatcher.add_handler(Arc::new(ResultsRecorder::new(ingestion.clone())));
        dispatcher.start_listening().await;

        TestStack {
            event_bus,
            store,
            directory,
            ingestion,
            query,
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "podium=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
