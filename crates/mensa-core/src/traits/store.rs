use crate::error::Result;
use crate::types::{
    Canteen, CheckIn, CheckInId, CrowdState, NewCheckIn, StatusFeed, StatusKey, TimestampMillis,
};
use async_trait::async_trait;

/// Capability interface over the durable check-in store.
///
/// The engine depends only on these verbs; it never assumes a query
/// language beyond an equality filter on the canteen and an inclusive
/// range filter on `created_at`. Backends classify their own timeouts
/// and connectivity failures as `StoreUnavailable`.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a check-in event. Returns the store-assigned id.
    async fn insert_check_in(&self, check_in: NewCheckIn) -> Result<CheckInId>;

    /// All check-ins for one canteen with `created_at` in
    /// `[from, to]`, both ends inclusive, in insertion order.
    ///
    /// A record whose stored crowd-level label is unrecognized is still
    /// returned, decoded as `Moderate`; a wholly undecodable document is
    /// skipped, never an error.
    async fn check_ins_between(
        &self,
        canteen_id: &str,
        from: TimestampMillis,
        to: TimestampMillis,
    ) -> Result<Vec<CheckIn>>;

    /// Most recent check-ins for one canteen, newest first.
    async fn recent_check_ins(&self, canteen_id: &str, limit: usize) -> Result<Vec<CheckIn>>;

    /// Field-set update of the canteen record's derived crowd state.
    /// Must not touch the static fields (name, location, hours), which
    /// may be edited concurrently elsewhere.
    async fn set_crowd_state(&self, canteen_id: &str, state: &CrowdState) -> Result<()>;

    /// Read one canteen record.
    async fn canteen(&self, canteen_id: &str) -> Result<Option<Canteen>>;

    /// Read all canteen records, ordered by id.
    async fn canteens(&self) -> Result<Vec<Canteen>>;

    /// Subscribe to committed crowd-state updates for the given key.
    /// The feed carries only updates committed after subscription; the
    /// current snapshot comes from `canteen`/`canteens`.
    fn watch(&self, key: StatusKey) -> StatusFeed;
}
