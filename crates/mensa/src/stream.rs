//! Live canteen status subscriptions.
//!
//! Each subscription is a `futures::Stream`: the current snapshot is
//! delivered immediately, then every crowd-state commit for the key, in
//! commit order per canteen. Dropping the stream cancels it and releases
//! the underlying feed; an in-flight delivery at cancellation time may
//! still be observed once. A subscription that falls too far behind the
//! feed fails once with `StoreUnavailable` and ends.

use futures::stream::{self, Stream};
use mensa_core::{Canteen, CanteenId, CrowdError, EventStore, Result, StatusFeed, StatusKey};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

enum AllState<S> {
    Snapshot { store: Arc<S>, feed: StatusFeed },
    Live {
        index: BTreeMap<CanteenId, Canteen>,
        feed: StatusFeed,
    },
    Done,
}

/// Subscribe to the full canteen listing.
///
/// Yields the listing once on subscription, then a refreshed listing for
/// every committed crowd-state update on any canteen.
pub fn observe_all<S>(store: Arc<S>) -> impl Stream<Item = Result<Vec<Canteen>>> + Send
where
    S: EventStore + 'static,
{
    // Subscribe before the snapshot read so no commit can fall in the
    // gap between them. An update committed between the two may be
    // delivered twice; replays of a full snapshot are harmless.
    let feed = store.watch(StatusKey::All);
    stream::unfold(AllState::Snapshot { store, feed }, |state| async move {
        match state {
            AllState::Snapshot { store, feed } => match store.canteens().await {
                Ok(canteens) => {
                    let index = canteens
                        .iter()
                        .map(|c| (c.id.clone(), c.clone()))
                        .collect();
                    Some((Ok(canteens), AllState::Live { index, feed }))
                }
                Err(e) => Some((Err(e), AllState::Done)),
            },
            AllState::Live { mut index, mut feed } => match feed.recv().await {
                Ok(updated) => {
                    index.insert(updated.id.clone(), updated);
                    let listing = index.values().cloned().collect();
                    Some((Ok(listing), AllState::Live { index, feed }))
                }
                Err(RecvError::Closed) => None,
                Err(RecvError::Lagged(n)) => Some((
                    Err(CrowdError::StoreUnavailable(format!(
                        "status feed lagged by {n} updates"
                    ))),
                    AllState::Done,
                )),
            },
            AllState::Done => None,
        }
    })
}

enum OneState<S> {
    Snapshot {
        store: Arc<S>,
        id: CanteenId,
        feed: StatusFeed,
    },
    Live { feed: StatusFeed },
    Done,
}

/// Subscribe to a single canteen's status.
///
/// Yields the current record once on subscription, then every committed
/// crowd-state update for it. Fails once with `NotFound` if the canteen
/// does not exist.
pub fn observe_canteen<S>(
    store: Arc<S>,
    canteen_id: CanteenId,
) -> impl Stream<Item = Result<Canteen>> + Send
where
    S: EventStore + 'static,
{
    let feed = store.watch(StatusKey::Canteen(canteen_id.clone()));
    let initial = OneState::Snapshot {
        store,
        id: canteen_id,
        feed,
    };
    stream::unfold(initial, |state| async move {
        match state {
            OneState::Snapshot { store, id, feed } => match store.canteen(&id).await {
                Ok(Some(canteen)) => Some((Ok(canteen), OneState::Live { feed })),
                Ok(None) => Some((
                    Err(CrowdError::NotFound(format!("canteen {id}"))),
                    OneState::Done,
                )),
                Err(e) => Some((Err(e), OneState::Done)),
            },
            OneState::Live { mut feed } => match feed.recv().await {
                Ok(updated) => Some((Ok(updated), OneState::Live { feed })),
                Err(RecvError::Closed) => None,
                Err(RecvError::Lagged(n)) => Some((
                    Err(CrowdError::StoreUnavailable(format!(
                        "status feed lagged by {n} updates"
                    ))),
                    OneState::Done,
                )),
            },
            OneState::Done => None,
        }
    })
}
