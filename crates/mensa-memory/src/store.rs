use async_trait::async_trait;
use mensa_core::{
    Canteen, CanteenId, CheckIn, CheckInId, CrowdError, CrowdState, EventStore, NewCheckIn,
    Result, StatusFeed, StatusKey, StreamConfig, TimestampMillis,
};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

struct Inner {
    canteens: BTreeMap<CanteenId, Canteen>,
    /// Check-in documents in insertion order, JSON-shaped like the
    /// remote document store holds them.
    check_ins: Vec<Value>,
    next_id: u64,
}

/// Process-local `EventStore`.
///
/// One broadcast feed per canteen plus a global feed back the `watch`
/// verb; a committed crowd-state update is published to both, so
/// per-canteen delivery order matches commit order.
pub struct MemoryStore {
    inner: RwLock<Inner>,
    feeds: RwLock<HashMap<CanteenId, broadcast::Sender<Canteen>>>,
    all_feed: broadcast::Sender<Canteen>,
    config: StreamConfig,
    /// Simulate total store outage (every verb fails). Test affordance.
    offline: AtomicBool,
    /// Simulate failing projection writes only. Test affordance.
    fail_state_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_config(StreamConfig::default())
    }

    pub fn with_config(config: StreamConfig) -> Self {
        let (all_feed, _) = broadcast::channel(config.feed_capacity);
        Self {
            inner: RwLock::new(Inner {
                canteens: BTreeMap::new(),
                check_ins: Vec::new(),
                next_id: 1,
            }),
            feeds: RwLock::new(HashMap::new()),
            all_feed,
            config,
            offline: AtomicBool::new(false),
            fail_state_writes: AtomicBool::new(false),
        }
    }

    /// Seed or replace a canteen record. Seeding happens outside the
    /// engine; the engine itself only ever touches `crowd_state`.
    pub fn upsert_canteen(&self, canteen: Canteen) {
        self.inner
            .write()
            .canteens
            .insert(canteen.id.clone(), canteen);
    }

    /// Inject a raw check-in document, bypassing typed validation.
    /// Lets tests plant corrupted or legacy-shaped records.
    pub fn insert_check_in_document(&self, doc: Value) {
        self.inner.write().check_ins.push(doc);
    }

    /// Make every store verb fail with `StoreUnavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make only `set_crowd_state` fail with `StoreUnavailable`.
    pub fn set_fail_state_writes(&self, fail: bool) {
        self.fail_state_writes.store(fail, Ordering::SeqCst);
    }

    pub fn check_in_count(&self) -> usize {
        self.inner.read().check_ins.len()
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(CrowdError::StoreUnavailable("store offline".into()))
        } else {
            Ok(())
        }
    }

    fn canteen_feed(&self, canteen_id: &str) -> broadcast::Sender<Canteen> {
        let mut feeds = self.feeds.write();
        feeds
            .entry(canteen_id.to_string())
            .or_insert_with(|| broadcast::channel(self.config.feed_capacity).0)
            .clone()
    }

    fn decode(doc: &Value) -> Option<CheckIn> {
        match serde_json::from_value::<CheckIn>(doc.clone()) {
            Ok(check_in) => Some(check_in),
            Err(err) => {
                tracing::warn!("skipping undecodable check-in document: {err}");
                None
            }
        }
    }

    fn created_at(doc: &Value) -> Option<TimestampMillis> {
        doc.get("createdAt").and_then(Value::as_i64)
    }

    fn is_for_canteen(doc: &Value, canteen_id: &str) -> bool {
        doc.get("canteenId").and_then(Value::as_str) == Some(canteen_id)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert_check_in(&self, check_in: NewCheckIn) -> Result<CheckInId> {
        self.ensure_online()?;
        let mut doc = serde_json::to_value(&check_in)?;
        let mut inner = self.inner.write();
        let id = format!("chk-{:06}", inner.next_id);
        inner.next_id += 1;
        doc["id"] = Value::String(id.clone());
        inner.check_ins.push(doc);
        Ok(id)
    }

    async fn check_ins_between(
        &self,
        canteen_id: &str,
        from: TimestampMillis,
        to: TimestampMillis,
    ) -> Result<Vec<CheckIn>> {
        self.ensure_online()?;
        let inner = self.inner.read();
        Ok(inner
            .check_ins
            .iter()
            .filter(|doc| Self::is_for_canteen(doc, canteen_id))
            .filter(|doc| {
                Self::created_at(doc).is_some_and(|at| at >= from && at <= to)
            })
            .filter_map(Self::decode)
            .collect())
    }

    async fn recent_check_ins(&self, canteen_id: &str, limit: usize) -> Result<Vec<CheckIn>> {
        self.ensure_online()?;
        let inner = self.inner.read();
        let mut check_ins: Vec<CheckIn> = inner
            .check_ins
            .iter()
            .filter(|doc| Self::is_for_canteen(doc, canteen_id))
            .filter_map(Self::decode)
            .collect();
        check_ins.sort_by_key(|c| std::cmp::Reverse(c.created_at));
        check_ins.truncate(limit);
        Ok(check_ins)
    }

    async fn set_crowd_state(&self, canteen_id: &str, state: &CrowdState) -> Result<()> {
        self.ensure_online()?;
        if self.fail_state_writes.load(Ordering::SeqCst) {
            return Err(CrowdError::StoreUnavailable(
                "state write rejected".into(),
            ));
        }
        let updated = {
            let mut inner = self.inner.write();
            let canteen = inner
                .canteens
                .get_mut(canteen_id)
                .ok_or_else(|| CrowdError::NotFound(format!("canteen {canteen_id}")))?;
            // Field-set semantics: only the derived sub-record changes.
            canteen.crowd_state = state.clone();
            canteen.clone()
        };
        // Publish after the write lock is released. send() only errors
        // when nobody subscribes, which is fine.
        let _ = self.canteen_feed(canteen_id).send(updated.clone());
        let _ = self.all_feed.send(updated);
        Ok(())
    }

    async fn canteen(&self, canteen_id: &str) -> Result<Option<Canteen>> {
        self.ensure_online()?;
        Ok(self.inner.read().canteens.get(canteen_id).cloned())
    }

    async fn canteens(&self) -> Result<Vec<Canteen>> {
        self.ensure_online()?;
        Ok(self.inner.read().canteens.values().cloned().collect())
    }

    fn watch(&self, key: StatusKey) -> StatusFeed {
        match key {
            StatusKey::All => self.all_feed.subscribe(),
            StatusKey::Canteen(id) => self.canteen_feed(&id).subscribe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mensa_core::CrowdLevel;
    use serde_json::json;

    fn new_check_in(canteen: &str, level: CrowdLevel, at: TimestampMillis) -> NewCheckIn {
        NewCheckIn {
            canteen_id: canteen.to_string(),
            user_id: "u1".to_string(),
            user_name: "Sam".to_string(),
            crowd_level: level,
            wait_time_minutes: 5,
            comment: String::new(),
            created_at: at,
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store
            .insert_check_in(new_check_in("north", CrowdLevel::Low, 100))
            .await
            .unwrap();
        let b = store
            .insert_check_in(new_check_in("north", CrowdLevel::Low, 200))
            .await
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(store.check_in_count(), 2);
    }

    #[tokio::test]
    async fn range_query_is_inclusive_on_both_ends() {
        let store = MemoryStore::new();
        for at in [99, 100, 150, 200, 201] {
            store
                .insert_check_in(new_check_in("north", CrowdLevel::Busy, at))
                .await
                .unwrap();
        }
        let hits = store.check_ins_between("north", 100, 200).await.unwrap();
        let stamps: Vec<_> = hits.iter().map(|c| c.created_at).collect();
        assert_eq!(stamps, vec![100, 150, 200]);
    }

    #[tokio::test]
    async fn range_query_filters_by_canteen() {
        let store = MemoryStore::new();
        store
            .insert_check_in(new_check_in("north", CrowdLevel::Busy, 100))
            .await
            .unwrap();
        store
            .insert_check_in(new_check_in("south", CrowdLevel::Busy, 100))
            .await
            .unwrap();
        let hits = store.check_ins_between("north", 0, 1_000).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].canteen_id, "north");
    }

    #[tokio::test]
    async fn corrupted_level_label_decodes_as_moderate() {
        let store = MemoryStore::new();
        store.insert_check_in_document(json!({
            "id": "chk-raw",
            "canteenId": "north",
            "userId": "u9",
            "userName": "Kim",
            "crowdLevel": "TOTALLY_SLAMMED",
            "waitTimeMinutes": 4,
            "createdAt": 100,
        }));
        let hits = store.check_ins_between("north", 0, 1_000).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].crowd_level, CrowdLevel::Moderate);
    }

    #[tokio::test]
    async fn undecodable_document_is_skipped_not_fatal() {
        let store = MemoryStore::new();
        store.insert_check_in_document(json!({
            "canteenId": "north",
            "createdAt": 100,
            // missing required fields entirely
        }));
        store
            .insert_check_in(new_check_in("north", CrowdLevel::Low, 150))
            .await
            .unwrap();
        let hits = store.check_ins_between("north", 0, 1_000).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].crowd_level, CrowdLevel::Low);
    }

    #[tokio::test]
    async fn set_crowd_state_requires_existing_canteen() {
        let store = MemoryStore::new();
        let err = store
            .set_crowd_state("nowhere", &CrowdState::fallback(0))
            .await
            .unwrap_err();
        assert!(matches!(err, CrowdError::NotFound(_)));
    }

    #[tokio::test]
    async fn set_crowd_state_preserves_static_fields() {
        let store = MemoryStore::new();
        store.upsert_canteen(Canteen::seeded("north", "North Hall", "Campus N", "8-20", 0));
        let state = CrowdState::for_level(CrowdLevel::Crowded, 9, 25, 500);
        store.set_crowd_state("north", &state).await.unwrap();

        let canteen = store.canteen("north").await.unwrap().unwrap();
        assert_eq!(canteen.name, "North Hall");
        assert_eq!(canteen.location, "Campus N");
        assert_eq!(canteen.crowd_state, state);
    }

    #[tokio::test]
    async fn watch_delivers_committed_updates_in_order() {
        let store = MemoryStore::new();
        store.upsert_canteen(Canteen::seeded("north", "North Hall", "Campus N", "8-20", 0));
        let mut feed = store.watch(StatusKey::Canteen("north".to_string()));

        for minutes in [5, 6, 7] {
            let state = CrowdState::for_level(CrowdLevel::Busy, 1, minutes, i64::from(minutes));
            store.set_crowd_state("north", &state).await.unwrap();
        }
        for minutes in [5u32, 6, 7] {
            let update = feed.recv().await.unwrap();
            assert_eq!(update.crowd_state.avg_wait_time_minutes, minutes);
        }
    }

    #[tokio::test]
    async fn offline_store_fails_every_verb() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let err = store.canteens().await.unwrap_err();
        assert!(matches!(err, CrowdError::StoreUnavailable(_)));
        let err = store
            .insert_check_in(new_check_in("north", CrowdLevel::Low, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, CrowdError::StoreUnavailable(_)));
    }
}
