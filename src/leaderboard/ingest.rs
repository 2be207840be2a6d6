use std::sync::Arc;

use async_trait::async_trait;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::event::{EventError, EventHandler, PlatformEvent};
use crate::identity::{fallback_display_name, DisplayNameSource, IdentityDirectory};

use super::errors::LeaderboardError;
use super::models::{LeaderboardKey, Period, ScoreSubmission};
use super::store::{ScoreStore, StoreError};

/// Service writing confirmed results onto the leaderboards.
///
/// Submissions carry absolute scores and fan out across the periods each
/// entry names. Processing is best-effort: a bad entry or an unreachable
/// scope is logged and skipped, and only a call where nothing could be
/// applied at all surfaces an error.
pub struct ScoreIngestionService {
    store: Arc<dyn ScoreStore>,
    directory: Arc<dyn IdentityDirectory>,
    identity_source: Option<Arc<dyn DisplayNameSource>>,
    default_periods: Vec<Period>,
}

impl ScoreIngestionService {
    pub fn builder(
        store: Arc<dyn ScoreStore>,
        directory: Arc<dyn IdentityDirectory>,
    ) -> ScoreIngestionServiceBuilder {
        ScoreIngestionServiceBuilder::new(store, directory)
    }

    /// Records one participant's scores for one game.
    ///
    /// Each valid entry is upserted into every period scope it names (the
    /// service defaults apply when an entry names none). Values are the new
    /// absolute scores, so replaying a submission is an idempotent overwrite.
    #[instrument(skip(self, scores))]
    pub async fn submit_scores(
        &self,
        participant_id: &str,
        display_name: Option<&str>,
        game_name: &str,
        scores: &[ScoreSubmission],
    ) -> Result<(), LeaderboardError> {
        if participant_id.trim().is_empty() {
            return Err(LeaderboardError::InvalidInput(
                "participant_id must not be blank".to_string(),
            ));
        }
        if game_name.trim().is_empty() {
            return Err(LeaderboardError::InvalidInput(
                "game_name must not be blank".to_string(),
            ));
        }
        if scores.is_empty() {
            debug!(
                participant_id = %participant_id,
                game_name = %game_name,
                "Submission carried no score entries"
            );
            return Ok(());
        }

        // Correlates every log line of one submission.
        let batch_id = Uuid::new_v4();

        self.refresh_display_name(participant_id, display_name)
            .await;

        let mut applied: u32 = 0;
        let mut attempted: u32 = 0;
        let mut last_failure: Option<StoreError> = None;

        for submission in scores {
            if submission.metric.trim().is_empty() {
                warn!(
                    batch_id = %batch_id,
                    participant_id = %participant_id,
                    "Skipping entry with blank metric"
                );
                continue;
            }
            if !submission.value.is_finite() {
                warn!(
                    batch_id = %batch_id,
                    participant_id = %participant_id,
                    metric = %submission.metric,
                    value = submission.value,
                    "Skipping entry with non-numeric value"
                );
                continue;
            }

            let periods: &[Period] = if submission.periods.is_empty() {
                &self.default_periods
            } else {
                &submission.periods
            };

            for period in periods {
                let key = LeaderboardKey::new(game_name, &submission.metric, *period);
                attempted += 1;
                match self
                    .store
                    .upsert(&key, participant_id, submission.value)
                    .await
                {
                    Ok(()) => applied += 1,
                    Err(err) => {
                        warn!(
                            batch_id = %batch_id,
                            key = %key,
                            participant_id = %participant_id,
                            error = %err,
                            "Score upsert failed, continuing with remaining scopes"
                        );
                        last_failure = Some(err);
                    }
                }
            }
        }

        info!(
            batch_id = %batch_id,
            participant_id = %participant_id,
            game_name = %game_name,
            applied,
            attempted,
            "Score submission processed"
        );

        match last_failure {
            Some(err) if applied == 0 => Err(LeaderboardError::StoreUnavailable(err)),
            _ => Ok(()),
        }
    }

    /// Resolves the display name for this submission and caches it.
    /// Identity problems never fail a submission.
    async fn refresh_display_name(&self, participant_id: &str, supplied: Option<&str>) {
        let resolved = match supplied {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => match self.lookup_display_name(participant_id).await {
                Some(name) => name,
                None => fallback_display_name(participant_id),
            },
        };

        if let Err(err) = self
            .directory
            .set_display_name(participant_id, &resolved)
            .await
        {
            warn!(
                participant_id = %participant_id,
                error = %err,
                "Display name cache update failed"
            );
        }
    }

    async fn lookup_display_name(&self, participant_id: &str) -> Option<String> {
        let source = self.identity_source.as_ref()?;
        match source.lookup(participant_id).await {
            Ok(name) => name,
            Err(err) => {
                warn!(
                    participant_id = %participant_id,
                    error = %err,
                    "Identity source lookup failed"
                );
                None
            }
        }
    }
}

pub struct ScoreIngestionServiceBuilder {
    store: Arc<dyn ScoreStore>,
    directory: Arc<dyn IdentityDirectory>,
    identity_source: Option<Arc<dyn DisplayNameSource>>,
    default_periods: Vec<Period>,
}

impl ScoreIngestionServiceBuilder {
    fn new(store: Arc<dyn ScoreStore>, directory: Arc<dyn IdentityDirectory>) -> Self {
        Self {
            store,
            directory,
            identity_source: None,
            default_periods: vec![Period::AllTime],
        }
    }

    pub fn with_identity_source(mut self, source: Arc<dyn DisplayNameSource>) -> Self {
        self.identity_source = Some(source);
        self
    }

    pub fn with_default_periods(mut self, periods: Vec<Period>) -> Self {
        self.default_periods = periods;
        self
    }

    /// Fan entries without explicit periods out to every period.
    pub fn with_all_periods(self) -> Self {
        self.with_default_periods(Period::iter().collect())
    }

    pub fn build(self) -> ScoreIngestionService {
        let default_periods = if self.default_periods.is_empty() {
            vec![Period::AllTime]
        } else {
            self.default_periods
        };
        ScoreIngestionService {
            store: self.store,
            directory: self.directory,
            identity_source: self.identity_source,
            default_periods,
        }
    }
}

/// Bridges completion events onto the ingestion path.
///
/// Walks every participant result in the event; one participant's failure
/// never stops the walk. Store-outage failures bubble up as retryable so the
/// dispatcher redelivers the event, which is safe because submissions are
/// absolute overwrites. Bad result payloads surface as non-retryable.
pub struct ResultsRecorder {
    ingestion: Arc<ScoreIngestionService>,
}

impl ResultsRecorder {
    pub fn new(ingestion: Arc<ScoreIngestionService>) -> Self {
        Self { ingestion }
    }
}

#[async_trait]
impl EventHandler for ResultsRecorder {
    async fn handle(&self, event: &PlatformEvent) -> Result<(), EventError> {
        let game_name = event.game_name();
        let mut retryable_failure: Option<LeaderboardError> = None;
        let mut permanent_failure: Option<LeaderboardError> = None;

        for result in event.results() {
            let outcome = self
                .ingestion
                .submit_scores(
                    &result.participant_id,
                    result.display_name.as_deref(),
                    game_name,
                    &result.scores,
                )
                .await;

            if let Err(err) = outcome {
                tracing::error!(
                    ?err,
                    participant_id = %result.participant_id,
                    game_name = %game_name,
                    "Failed to record completion results"
                );
                if err.is_retryable() {
                    retryable_failure = Some(err);
                } else {
                    permanent_failure = Some(err);
                }
            }
        }

        // A retryable failure wins: redelivery can still fix it.
        match (retryable_failure, permanent_failure) {
            (Some(err), _) => Err(EventError::retryable(err.to_string())),
            (None, Some(err)) => Err(EventError::non_retryable(err.to_string())),
            (None, None) => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "ResultsRecorder"
    }
}
