//! Keyed queries.
//!
//! A screen describes what it needs as a [`QueryKey`]. Requests are tagged
//! with the key plus the access epoch (bumped on every mode or identity
//! change) so that:
//! - identical concurrent requests share one fetch ([`QueryCache`])
//! - a reply for a tag the screen no longer wants is dropped ([`QuerySlot`])

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use journal_core::{DateRange, MetricsSnapshot, Trade, TradeQuery, TradesPage, UsersPage};
use tokio::sync::OnceCell;

use crate::api::JournalApi;
use crate::error::ClientError;

/// What a screen asks for. Built only from request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Trades(TradeQuery),
    Trade(String),
    Metrics(DateRange),
    Users,
}

/// A [`QueryKey`] within one access epoch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestTag {
    pub epoch: u64,
    pub key: QueryKey,
}

impl RequestTag {
    pub fn new(epoch: u64, key: QueryKey) -> Self {
        Self { epoch, key }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    Trades(TradesPage),
    Trade(Box<Trade>),
    Metrics(MetricsSnapshot),
    Users(UsersPage),
}

impl QueryData {
    pub fn into_trades(self) -> Option<TradesPage> {
        match self {
            QueryData::Trades(page) => Some(page),
            _ => None,
        }
    }

    pub fn into_trade(self) -> Option<Trade> {
        match self {
            QueryData::Trade(trade) => Some(*trade),
            _ => None,
        }
    }

    pub fn into_metrics(self) -> Option<MetricsSnapshot> {
        match self {
            QueryData::Metrics(snap) => Some(snap),
            _ => None,
        }
    }

    pub fn into_users(self) -> Option<UsersPage> {
        match self {
            QueryData::Users(users) => Some(users),
            _ => None,
        }
    }
}

/// Shared result of one fetch; errors are shared between all waiters.
pub type QueryOutcome = Result<QueryData, Arc<ClientError>>;

/// Narrow an outcome to the payload a slot holds.
pub fn project<T>(outcome: QueryOutcome, pick: fn(QueryData) -> Option<T>) -> Result<T, Arc<ClientError>> {
    outcome.and_then(|data| pick(data).ok_or_else(|| Arc::new(ClientError::UnexpectedPayload)))
}

/// Run the request `key` describes.
pub async fn load(api: &JournalApi, key: &QueryKey) -> Result<QueryData, ClientError> {
    match key {
        QueryKey::Trades(query) => api.list_trades(query).await.map(QueryData::Trades),
        QueryKey::Trade(id) => api.get_trade(id).await.map(|t| QueryData::Trade(Box::new(t))),
        QueryKey::Metrics(range) => api.get_metrics(range).await.map(QueryData::Metrics),
        QueryKey::Users => api.list_users().await.map(QueryData::Users),
    }
}

/// Deduplicating result cache.
///
/// The first caller for a tag runs the loader; callers arriving while it
/// runs wait for the same outcome. Outcomes stay until invalidated; the UI
/// invalidates a tag once no slot points at it.
#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<DashMap<RequestTag, Arc<OnceCell<QueryOutcome>>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fetch<F, Fut>(&self, tag: &RequestTag, loader: F) -> QueryOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = QueryOutcome>,
    {
        // The map guard must not be held across the await.
        let cell = self.entries.entry(tag.clone()).or_default().clone();
        cell.get_or_init(loader).await.clone()
    }

    pub fn invalidate(&self, tag: &RequestTag) {
        self.entries.remove(tag);
    }

    /// Drop everything outside `epoch`.
    pub fn retain_epoch(&self, epoch: u64) {
        self.entries.retain(|tag, _| tag.epoch == epoch);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum QueryState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(Arc<ClientError>),
}

/// One screen's view of one query.
#[derive(Debug, Clone)]
pub struct QuerySlot<T> {
    tag: Option<RequestTag>,
    state: QueryState<T>,
}

impl<T> Default for QuerySlot<T> {
    fn default() -> Self {
        Self {
            tag: None,
            state: QueryState::Idle,
        }
    }
}

impl<T> QuerySlot<T> {
    /// Point the slot at `tag`. Returns `true` when a request must be
    /// sent, i.e. the slot was not already on this tag.
    pub fn request(&mut self, tag: RequestTag) -> bool {
        if self.tag.as_ref() == Some(&tag) && !matches!(self.state, QueryState::Idle) {
            return false;
        }
        self.tag = Some(tag);
        self.state = QueryState::Loading;
        true
    }

    /// [`request`](Self::request), also returning the tag the slot moved
    /// off so its cache entry can be dropped.
    pub fn retarget(&mut self, tag: RequestTag) -> (bool, Option<RequestTag>) {
        let previous = self.tag.clone().filter(|old| *old != tag);
        (self.request(tag), previous)
    }

    /// Forget the current tag so the next `request` refetches.
    pub fn reset(&mut self) {
        self.tag = None;
        self.state = QueryState::Idle;
    }

    pub fn wants(&self, tag: &RequestTag) -> bool {
        self.tag.as_ref() == Some(tag)
    }

    /// Store an outcome if it belongs to the current tag. Returns whether
    /// it was applied.
    pub fn accept(&mut self, tag: &RequestTag, outcome: Result<T, Arc<ClientError>>) -> bool {
        if !self.wants(tag) {
            return false;
        }
        self.state = match outcome {
            Ok(value) => QueryState::Ready(value),
            Err(e) => QueryState::Failed(e),
        };
        true
    }

    pub fn tag(&self) -> Option<&RequestTag> {
        self.tag.as_ref()
    }

    pub fn state(&self) -> &QueryState<T> {
        &self.state
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            QueryState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, QueryState::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn tag(epoch: u64, id: &str) -> RequestTag {
        RequestTag::new(epoch, QueryKey::Trade(id.to_string()))
    }

    fn users() -> QueryOutcome {
        Ok(QueryData::Users(UsersPage::default()))
    }

    #[tokio::test]
    async fn concurrent_fetches_share_one_load() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let t = tag(0, "1");

        let fetches = (0..8).map(|_| {
            let cache = cache.clone();
            let calls = calls.clone();
            let t = t.clone();
            async move {
                cache
                    .fetch(&t, || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        users()
                    })
                    .await
            }
        });
        let outcomes = futures::future::join_all(fetches).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(outcomes.iter().all(|o| o.is_ok()));
    }

    #[tokio::test]
    async fn distinct_tags_load_separately_and_invalidate_refetches() {
        let cache = QueryCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let load = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            users()
        };

        cache.fetch(&tag(0, "1"), load).await.unwrap();
        cache.fetch(&tag(0, "2"), load).await.unwrap();
        cache.fetch(&tag(1, "1"), load).await.unwrap();
        cache.fetch(&tag(0, "1"), load).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        cache.invalidate(&tag(0, "1"));
        cache.fetch(&tag(0, "1"), load).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        cache.retain_epoch(1);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn errors_are_shared_not_retried() {
        let cache = QueryCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let fail = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Arc::new(ClientError::RequestFailed { status: 500 }))
        };

        assert!(cache.fetch(&tag(0, "1"), fail).await.is_err());
        assert!(cache.fetch(&tag(0, "1"), fail).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn slot_drops_stale_outcomes() {
        let mut slot: QuerySlot<u32> = QuerySlot::default();

        assert!(slot.request(tag(0, "1")));
        assert!(slot.is_loading());
        // Filter changed before the first reply arrived.
        assert!(slot.request(tag(0, "2")));

        assert!(!slot.accept(&tag(0, "1"), Ok(1)));
        assert!(slot.is_loading());
        assert!(slot.accept(&tag(0, "2"), Ok(2)));
        assert_eq!(slot.data(), Some(&2));
    }

    #[test]
    fn slot_skips_repeat_requests_until_reset() {
        let mut slot: QuerySlot<u32> = QuerySlot::default();
        assert!(slot.request(tag(0, "1")));
        assert!(!slot.request(tag(0, "1")));
        slot.accept(&tag(0, "1"), Ok(5));
        assert!(!slot.request(tag(0, "1")));

        // Same key, new epoch: mode or identity changed.
        assert!(slot.request(tag(1, "1")));
        assert!(!slot.accept(&tag(0, "1"), Ok(6)));

        slot.reset();
        assert!(matches!(slot.state(), QueryState::Idle));
        assert!(slot.request(tag(1, "1")));
    }

    #[test]
    fn retarget_hands_back_the_tag_left_behind() {
        let mut slot: QuerySlot<u32> = QuerySlot::default();
        assert_eq!(slot.retarget(tag(0, "1")), (true, None));
        assert_eq!(slot.retarget(tag(0, "1")), (false, None));
        assert_eq!(slot.retarget(tag(0, "2")), (true, Some(tag(0, "1"))));
        assert!(slot.wants(&tag(0, "2")));
    }

    #[test]
    fn projection_checks_the_variant() {
        let page: Result<UsersPage, _> = project(users(), QueryData::into_users);
        assert!(page.is_ok());

        let trades = project(users(), QueryData::into_trades);
        assert!(matches!(trades.as_ref().map_err(|e| &**e), Err(ClientError::UnexpectedPayload)));
    }

    #[test]
    fn slot_records_failures() {
        let mut slot: QuerySlot<u32> = QuerySlot::default();
        slot.request(tag(0, "9"));
        let err = Arc::new(ClientError::NotFound { id: "9".into() });
        assert!(slot.accept(&tag(0, "9"), Err(err)));
        match slot.state() {
            QueryState::Failed(e) => assert!(e.is_denied_or_missing()),
            other => panic!("unexpected state {:?}", other),
        }
    }
}
