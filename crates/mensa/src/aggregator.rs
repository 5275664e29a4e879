//! Window aggregation: the algorithmic heart of the engine.

use mensa_core::observe;
use mensa_core::{CheckIn, CrowdLevel, CrowdState, EventStore, Result, TimestampMillis};
use std::sync::Arc;
use std::time::Instant;

/// Trailing window length. Fixed; check-ins older than this never count.
pub const WINDOW_MINUTES: i64 = 30;

const WINDOW_MILLIS: i64 = WINDOW_MINUTES * 60 * 1_000;

/// Compute a `CrowdState` from the check-ins inside one window.
///
/// Pure: given the same slice and `as_of` this always returns the same
/// state, which is what makes the whole pipeline idempotent under
/// re-triggering.
///
/// Averaging truncates toward zero, for both the wait time and the
/// ordinal crowd-level rank; a mean exactly between two adjacent levels
/// lands on the lower (less crowded) one.
pub fn aggregate_window(check_ins: &[CheckIn], as_of: TimestampMillis) -> CrowdState {
    if check_ins.is_empty() {
        return CrowdState::fallback(as_of);
    }

    let count = check_ins.len() as u64;
    let wait_sum: u64 = check_ins
        .iter()
        .map(|c| u64::from(c.wait_time_minutes))
        .sum();
    let rank_sum: u64 = check_ins.iter().map(|c| u64::from(c.crowd_level.rank())).sum();

    // Integer division on non-negative sums == truncation toward zero.
    let avg_wait = (wait_sum / count) as u32;
    let avg_rank = (rank_sum / count) as i64;

    let level = CrowdLevel::from_rank(avg_rank);
    CrowdState::for_level(level, check_ins.len(), avg_wait, as_of)
}

/// Recomputes the derived state for one canteen from the store.
///
/// Every invocation re-reads the full trailing window rather than
/// keeping a running aggregate; the result is therefore always
/// consistent with some valid window snapshot, even when near-
/// simultaneous check-ins trigger overlapping recomputations.
pub struct CrowdAggregator<S: EventStore> {
    store: Arc<S>,
}

impl<S: EventStore> Clone for CrowdAggregator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: EventStore> CrowdAggregator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Query `[as_of - 30min, as_of]` (inclusive) and aggregate it.
    pub async fn recompute(&self, canteen_id: &str, as_of: TimestampMillis) -> Result<CrowdState> {
        let start = Instant::now();
        let window = self
            .store
            .check_ins_between(canteen_id, as_of - WINDOW_MILLIS, as_of)
            .await?;
        let state = aggregate_window(&window, as_of);
        observe::record_recompute(start.elapsed(), window.len());
        tracing::debug!(
            "recomputed {}: {} check-ins -> {:?}",
            canteen_id,
            state.check_ins_in_window,
            state.current_crowd_level
        );
        Ok(state)
    }
}
