//! Check-in ingestion and the recomputation trigger.

use crate::aggregator::CrowdAggregator;
use crate::projector::CrowdStateProjector;
use mensa_core::observe;
use mensa_core::{
    AuthProvider, CheckIn, Clock, CrowdError, CrowdLevel, EventStore, IngestConfig, NewCheckIn,
    Result, SystemClock, TimestampMillis,
};
use std::sync::Arc;

/// Validates and persists one check-in, then triggers recomputation.
///
/// The trigger is fire-and-forget: the check-in's own success never
/// depends on aggregation or projection succeeding. A failed refresh is
/// logged and left for the next check-in's trigger to heal.
pub struct CheckInIngest<S: EventStore + 'static> {
    store: Arc<S>,
    auth: Arc<dyn AuthProvider>,
    clock: Arc<dyn Clock>,
    aggregator: CrowdAggregator<S>,
    projector: CrowdStateProjector<S>,
    config: IngestConfig,
}

impl<S: EventStore + 'static> CheckInIngest<S> {
    pub fn new(store: Arc<S>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            aggregator: CrowdAggregator::new(Arc::clone(&store)),
            projector: CrowdStateProjector::new(Arc::clone(&store)),
            store,
            auth,
            clock: Arc::new(SystemClock),
            config: IngestConfig::default(),
        }
    }

    /// Replace the ingest clock. Tests inject a fixed clock so window
    /// boundaries are exact.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: IngestConfig) -> Self {
        self.config = config;
        self
    }

    /// Persist a check-in on behalf of the signed-in user.
    ///
    /// `created_at` comes from the ingest clock, never the client.
    /// Canteen existence is a store-level concern and is not checked
    /// here; only non-emptiness of the id is validated locally.
    pub async fn submit(
        &self,
        canteen_id: &str,
        crowd_level: CrowdLevel,
        wait_time_minutes: u32,
        comment: Option<String>,
    ) -> Result<CheckIn> {
        let user = self.auth.current_user().ok_or(CrowdError::Unauthenticated)?;
        if canteen_id.trim().is_empty() {
            return Err(CrowdError::InvalidInput("canteen id must not be empty".into()));
        }
        let comment = comment.unwrap_or_default();
        if comment.chars().count() > self.config.max_comment_chars {
            return Err(CrowdError::InvalidInput(format!(
                "comment exceeds {} characters",
                self.config.max_comment_chars
            )));
        }

        let created_at = self.clock.now_millis();
        let new = NewCheckIn {
            canteen_id: canteen_id.to_string(),
            user_id: user.uid,
            user_name: user.display_name,
            crowd_level,
            wait_time_minutes,
            comment,
            created_at,
        };
        let id = self.store.insert_check_in(new.clone()).await?;
        observe::record_check_in();
        let check_in = CheckIn::from_new(id, new);

        // Trigger recompute + project. Errors are logged, never
        // propagated to the submitting user.
        let aggregator = self.aggregator.clone();
        let projector = self.projector.clone();
        let canteen = check_in.canteen_id.clone();
        if self.config.recompute_inline {
            // Deterministic mode: finish the refresh before submit returns.
            refresh_logged(&aggregator, &projector, &canteen, created_at).await;
        } else {
            tokio::spawn(async move {
                refresh_logged(&aggregator, &projector, &canteen, created_at).await;
            });
        }
        Ok(check_in)
    }
}

async fn refresh_logged<S: EventStore>(
    aggregator: &CrowdAggregator<S>,
    projector: &CrowdStateProjector<S>,
    canteen_id: &str,
    as_of: TimestampMillis,
) {
    if let Err(e) = refresh(aggregator, projector, canteen_id, as_of).await {
        tracing::warn!("crowd state refresh failed for {}: {}", canteen_id, e);
    }
}

async fn refresh<S: EventStore>(
    aggregator: &CrowdAggregator<S>,
    projector: &CrowdStateProjector<S>,
    canteen_id: &str,
    as_of: TimestampMillis,
) -> Result<()> {
    let state = aggregator.recompute(canteen_id, as_of).await?;
    projector.apply(canteen_id, &state).await
}
