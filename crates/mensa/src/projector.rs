//! Write-back of the derived state onto the canteen record.

use mensa_core::observe;
use mensa_core::{CrowdState, EventStore, Result};
use std::sync::Arc;

/// Applies a computed `CrowdState` to the canteen's durable record.
///
/// A single field-set update of the derived sub-record; the static
/// fields (name, location, hours) are never touched, so concurrent
/// edits to them cannot be clobbered. Failures are reported to the
/// caller and not retried here: the next check-in triggers a fresh
/// recomputation, which heals the materialized view.
pub struct CrowdStateProjector<S: EventStore> {
    store: Arc<S>,
}

impl<S: EventStore> Clone for CrowdStateProjector<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: EventStore> CrowdStateProjector<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn apply(&self, canteen_id: &str, state: &CrowdState) -> Result<()> {
        let result = self.store.set_crowd_state(canteen_id, state).await;
        observe::record_projection(result.is_ok());
        if let Err(e) = &result {
            tracing::error!("projection failed for {}: {}", canteen_id, e);
        }
        result
    }
}
