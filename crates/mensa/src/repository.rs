//! The facade consumed by the presentation layer.

use crate::ingest::CheckInIngest;
use crate::stream;
use futures::stream::{Stream, StreamExt};
use mensa_core::{
    AuthProvider, Canteen, CheckIn, Clock, CrowdError, CrowdLevel, Envelope, EventStore,
    IngestConfig, Result,
};
use std::sync::Arc;

/// Canteen repository: every operation resolves to the uniform
/// [`Envelope`], and the observation streams additionally open with
/// `Loading` before the first snapshot.
///
/// Thin by design; the engine components behind it carry the semantics.
pub struct CanteenRepository<S: EventStore + 'static> {
    store: Arc<S>,
    ingest: CheckInIngest<S>,
}

impl<S: EventStore + 'static> CanteenRepository<S> {
    pub fn new(store: Arc<S>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            ingest: CheckInIngest::new(Arc::clone(&store), auth),
            store,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.ingest = self.ingest.with_clock(clock);
        self
    }

    pub fn with_ingest_config(mut self, config: IngestConfig) -> Self {
        self.ingest = self.ingest.with_config(config);
        self
    }

    /// Live listing of all canteens with their current crowd state.
    pub fn observe_canteens(&self) -> impl Stream<Item = Envelope<Vec<Canteen>>> + Send {
        let inner = stream::observe_all(Arc::clone(&self.store));
        futures::stream::once(async { Envelope::Loading }).chain(inner.map(Envelope::from))
    }

    /// Live view of one canteen.
    pub fn observe_canteen(
        &self,
        canteen_id: impl Into<String>,
    ) -> impl Stream<Item = Envelope<Canteen>> + Send {
        let inner = stream::observe_canteen(Arc::clone(&self.store), canteen_id.into());
        futures::stream::once(async { Envelope::Loading }).chain(inner.map(Envelope::from))
    }

    /// Submit a check-in for the signed-in user.
    ///
    /// Takes the wait time as a raw integer so untyped client input can
    /// be rejected as `InvalidInput` instead of silently wrapping.
    pub async fn check_in(
        &self,
        canteen_id: &str,
        crowd_level: CrowdLevel,
        wait_time_minutes: i64,
        comment: Option<String>,
    ) -> Envelope<CheckIn> {
        let wait = match u32::try_from(wait_time_minutes) {
            Ok(wait) => wait,
            Err(_) => {
                return Envelope::Error(
                    CrowdError::InvalidInput("wait time must be a non-negative minute count".into())
                        .to_string(),
                )
            }
        };
        self.ingest
            .submit(canteen_id, crowd_level, wait, comment)
            .await
            .into()
    }

    /// Most recent check-ins for one canteen, newest first.
    pub async fn recent_check_ins(&self, canteen_id: &str, limit: usize) -> Envelope<Vec<CheckIn>> {
        self.recent_check_ins_inner(canteen_id, limit).await.into()
    }

    async fn recent_check_ins_inner(&self, canteen_id: &str, limit: usize) -> Result<Vec<CheckIn>> {
        if self.store.canteen(canteen_id).await?.is_none() {
            return Err(CrowdError::NotFound(format!("canteen {canteen_id}")));
        }
        self.store.recent_check_ins(canteen_id, limit).await
    }
}
