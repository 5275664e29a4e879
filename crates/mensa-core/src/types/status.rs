use crate::types::{Canteen, CanteenId};

/// Subscription key for live status delivery: one canteen, or the whole
/// listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatusKey {
    All,
    Canteen(CanteenId),
}

/// Feed of committed canteen snapshots from the store.
///
/// Deliveries for a given canteen arrive in commit order; different
/// canteens' deliveries may interleave arbitrarily. A lagged receiver
/// surfaces as `RecvError::Lagged`, which subscribers treat as a
/// terminal failure of that subscription.
pub type StatusFeed = tokio::sync::broadcast::Receiver<Canteen>;
