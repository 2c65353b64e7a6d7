//! Keyed query cache with a freshness window, request de-duplication and
//! explicit invalidation.
//!
//! Each key owns at most one in-flight fetch. The fetch runs as a spawned
//! task wrapped in a [`Shared`] future, so every reader that arrives while it
//! is outstanding awaits the same request, and a reader that goes away never
//! leaves the entry stuck in `Loading`.

use crate::errors::ApiError;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use std::{
    any::Any,
    collections::HashMap,
    fmt,
    future::Future,
    sync::Arc,
    time::Duration,
};
use tokio::{sync::Mutex, time::Instant};
use tracing::{debug, warn};

pub const STALE_TIME: Duration = Duration::from_secs(60);

type Payload = Arc<dyn Any + Send + Sync>;
type InFlight = Shared<BoxFuture<'static, Result<Payload, ApiError>>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn summary() -> Self {
        Self::new(["summary"])
    }

    pub fn pending_goals() -> Self {
        Self::new(["pending-goals"])
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// What a reader sees for one key.
#[derive(Debug)]
pub struct QueryState<T> {
    pub status: QueryStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<ApiError>,
}

impl<T> QueryState<T> {
    fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
        }
    }

    /// Loading with nothing to show yet.
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading && self.data.is_none() && self.error.is_none()
    }

    /// The last fetch failed. Stays set while a retry is in flight.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
        }
    }
}

struct CacheEntry {
    data: Option<Payload>,
    status: QueryStatus,
    error: Option<ApiError>,
    fetched_at: Option<Instant>,
    invalidated: bool,
    in_flight: Option<InFlight>,
    generation: u64,
}

impl Default for CacheEntry {
    fn default() -> Self {
        Self {
            data: None,
            status: QueryStatus::Idle,
            error: None,
            fetched_at: None,
            invalidated: false,
            in_flight: None,
            generation: 0,
        }
    }
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, stale_time: Duration) -> bool {
        if self.invalidated
            || self.in_flight.is_some()
            || self.status != QueryStatus::Success
            || self.data.is_none()
        {
            return false;
        }
        self.fetched_at
            .is_some_and(|fetched_at| now.saturating_duration_since(fetched_at) <= stale_time)
    }

    fn is_stale(&self, now: Instant, stale_time: Duration) -> bool {
        !self.is_fresh(now, stale_time)
    }

    /// A fetch that was superseded by a newer one still stores its data, but
    /// leaves status and the in-flight handle to the newer fetch.
    fn settle(&mut self, generation: u64, result: &Result<Payload, ApiError>) {
        let current = generation == self.generation;
        match result {
            Ok(payload) => {
                self.data = Some(Arc::clone(payload));
                self.fetched_at = Some(Instant::now());
                if current {
                    self.status = QueryStatus::Success;
                    self.error = None;
                }
            }
            Err(err) if current => {
                self.fetched_at = Some(Instant::now());
                self.status = QueryStatus::Error;
                self.error = Some(err.clone());
            }
            Err(_) => {}
        }
        if current {
            self.in_flight = None;
        }
    }

    /// The in-flight fetch to join, if any. A fetch that was invalidated
    /// while running cannot be joined; a new one has to follow it.
    fn joinable(&self) -> Option<InFlight> {
        if self.invalidated {
            None
        } else {
            self.in_flight.clone()
        }
    }

    fn snapshot<T: Send + Sync + 'static>(&self) -> QueryState<T> {
        QueryState {
            status: self.status,
            data: self.data.clone().and_then(|payload| payload.downcast::<T>().ok()),
            error: self.error.clone(),
        }
    }
}

#[derive(Clone)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<QueryKey, CacheEntry>>>,
    stale_time: Duration,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_stale_time(STALE_TIME)
    }

    pub fn with_stale_time(stale_time: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            stale_time,
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    /// Serves fresh data without calling `fetcher`; otherwise starts or joins
    /// the key's fetch and waits for it to settle. When the key was
    /// invalidated while a fetch was running, a new fetch is queued behind it
    /// and its result is the one returned.
    pub async fn get<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> QueryState<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let in_flight = {
            let mut entries = self.entries.lock().await;
            let entry = entries.entry(key.clone()).or_default();
            if entry.is_fresh(Instant::now(), self.stale_time) {
                debug!(%key, "cache hit");
                return entry.snapshot();
            }
            match entry.joinable() {
                Some(in_flight) => {
                    debug!(%key, "joining in-flight fetch");
                    in_flight
                }
                None => self.start_fetch(key, entry, fetcher),
            }
        };

        match in_flight.await {
            Ok(payload) => QueryState {
                status: QueryStatus::Success,
                data: payload.downcast::<T>().ok(),
                error: None,
            },
            Err(err) => {
                let previous = self.snapshot::<T>(key).await;
                QueryState {
                    status: QueryStatus::Error,
                    data: previous.data,
                    error: Some(err),
                }
            }
        }
    }

    /// Non-blocking read: kicks off a background fetch when the entry is
    /// missing or stale and returns whatever is cached right now.
    pub async fn observe<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> QueryState<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let mut entries = self.entries.lock().await;
        let entry = entries.entry(key.clone()).or_default();
        if entry.is_stale(Instant::now(), self.stale_time) && entry.joinable().is_none() {
            let _ = self.start_fetch(key, entry, fetcher);
        }
        entry.snapshot()
    }

    /// Marks the entry stale, keeping its data. A fetch already in flight
    /// still stores its result, but the next read starts a new fetch after it.
    pub async fn invalidate(&self, key: &QueryKey) {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get_mut(key) {
            entry.invalidated = true;
            debug!(%key, in_flight = entry.in_flight.is_some(), "invalidated");
        }
    }

    pub async fn snapshot<T: Send + Sync + 'static>(&self, key: &QueryKey) -> QueryState<T> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .map(CacheEntry::snapshot)
            .unwrap_or_else(QueryState::idle)
    }

    pub async fn is_stale(&self, key: &QueryKey) -> bool {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .is_none_or(|entry| entry.is_stale(Instant::now(), self.stale_time))
    }

    fn start_fetch<T, F, Fut>(&self, key: &QueryKey, entry: &mut CacheEntry, fetcher: F) -> InFlight
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let previous = entry.in_flight.take();
        debug!(%key, queued = previous.is_some(), "fetching");
        entry.status = QueryStatus::Loading;
        entry.invalidated = false;
        entry.generation += 1;
        let generation = entry.generation;

        let entries = Arc::clone(&self.entries);
        let owned_key = key.clone();
        let request = fetcher();
        let in_flight = async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            let result = request.await.map(|value| Arc::new(value) as Payload);
            if let Err(err) = &result {
                warn!(key = %owned_key, "fetch failed: {err}");
            }
            if let Some(entry) = entries.lock().await.get_mut(&owned_key) {
                entry.settle(generation, &result);
            }
            result
        }
        .boxed()
        .shared();

        entry.in_flight = Some(in_flight.clone());
        tokio::spawn(in_flight.clone());
        in_flight
    }
}
