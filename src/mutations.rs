use crate::api::RemoteApi;
use crate::cache::{QueryCache, QueryKey};
use crate::errors::ApiError;
use crate::models::NewGoal;
use std::{future::Future, sync::Arc};
use tracing::{error, info};

/// Runs writes against the remote API and invalidates the queries that
/// depend on them once the write succeeds.
#[derive(Clone)]
pub struct MutationExecutor {
    api: Arc<dyn RemoteApi>,
    cache: QueryCache,
}

impl MutationExecutor {
    pub fn new(api: Arc<dyn RemoteApi>, cache: QueryCache) -> Self {
        Self { api, cache }
    }

    /// Keys invalidated after every successful write, in this order.
    pub fn dependent_keys() -> [QueryKey; 2] {
        [QueryKey::summary(), QueryKey::pending_goals()]
    }

    pub async fn run<T, Fut>(&self, name: &str, write: Fut) -> Result<T, ApiError>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        match write.await {
            Ok(value) => {
                for key in Self::dependent_keys() {
                    self.cache.invalidate(&key).await;
                }
                info!(mutation = name, "mutation applied");
                Ok(value)
            }
            Err(err) => {
                error!(mutation = name, "mutation failed: {err}");
                Err(err)
            }
        }
    }

    pub async fn create_goal(&self, title: &str, desired_weekly_frequency: i64) -> Result<(), ApiError> {
        let goal = match NewGoal::new(title, desired_weekly_frequency) {
            Ok(goal) => goal,
            Err(err) => {
                error!(mutation = "create_goal", "rejected locally: {err}");
                return Err(err);
            }
        };
        self.run("create_goal", self.api.create_goal(&goal)).await
    }

    pub async fn complete_goal(&self, goal_id: &str) -> Result<(), ApiError> {
        self.run("complete_goal", self.api.create_completion(goal_id))
            .await
    }

    pub async fn undo_completion(&self, completion_id: &str) -> Result<(), ApiError> {
        self.run("undo_completion", self.api.delete_completion(completion_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PendingGoal, Summary};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// In-memory remote API recording every write it receives.
    #[derive(Default)]
    struct FakeApi {
        summary: Mutex<Summary>,
        pending: Mutex<Vec<PendingGoal>>,
        writes: Mutex<Vec<String>>,
        summary_fetches: AtomicUsize,
        pending_fetches: AtomicUsize,
        fail_writes: AtomicBool,
    }

    impl FakeApi {
        fn write(&self, entry: String) -> Result<(), ApiError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ApiError::network("503 Service Unavailable"));
            }
            self.writes.lock().unwrap().push(entry);
            Ok(())
        }
    }

    #[async_trait]
    impl RemoteApi for FakeApi {
        async fn fetch_summary(&self) -> Result<Summary, ApiError> {
            self.summary_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.summary.lock().unwrap().clone())
        }

        async fn fetch_pending_goals(&self) -> Result<Vec<PendingGoal>, ApiError> {
            self.pending_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.pending.lock().unwrap().clone())
        }

        async fn create_goal(&self, goal: &NewGoal) -> Result<(), ApiError> {
            self.write(format!("goal:{}:{}", goal.title(), goal.desired_weekly_frequency()))
        }

        async fn create_completion(&self, goal_id: &str) -> Result<(), ApiError> {
            self.write(format!("complete:{goal_id}"))
        }

        async fn delete_completion(&self, completion_id: &str) -> Result<(), ApiError> {
            self.write(format!("undo:{completion_id}"))
        }
    }

    async fn warm(cache: &QueryCache, api: &Arc<FakeApi>) {
        let summary_api = Arc::clone(api);
        cache
            .get(&QueryKey::summary(), move || async move {
                summary_api.fetch_summary().await
            })
            .await;
        let pending_api = Arc::clone(api);
        cache
            .get(&QueryKey::pending_goals(), move || async move {
                pending_api.fetch_pending_goals().await
            })
            .await;
    }

    fn executor(api: &Arc<FakeApi>, cache: &QueryCache) -> MutationExecutor {
        let remote: Arc<dyn RemoteApi> = api.clone();
        MutationExecutor::new(remote, cache.clone())
    }

    #[test]
    fn summary_is_invalidated_before_pending_goals() {
        let keys = MutationExecutor::dependent_keys();
        assert_eq!(keys[0], QueryKey::summary());
        assert_eq!(keys[1], QueryKey::pending_goals());
    }

    #[tokio::test]
    async fn completion_invalidates_both_queries() {
        let api = Arc::new(FakeApi::default());
        let cache = QueryCache::new();
        warm(&cache, &api).await;
        assert!(!cache.is_stale(&QueryKey::summary()).await);

        executor(&api, &cache).complete_goal("g1").await.unwrap();

        assert!(cache.is_stale(&QueryKey::summary()).await);
        assert!(cache.is_stale(&QueryKey::pending_goals()).await);
        assert_eq!(*api.writes.lock().unwrap(), vec!["complete:g1".to_string()]);

        warm(&cache, &api).await;
        assert_eq!(api.summary_fetches.load(Ordering::SeqCst), 2);
        assert_eq!(api.pending_fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_write_leaves_cache_fresh() {
        let api = Arc::new(FakeApi::default());
        let cache = QueryCache::new();
        warm(&cache, &api).await;
        api.fail_writes.store(true, Ordering::SeqCst);

        let err = executor(&api, &cache)
            .create_goal("Run", 3)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Network(_)));
        assert!(!cache.is_stale(&QueryKey::summary()).await);
        assert!(!cache.is_stale(&QueryKey::pending_goals()).await);
    }

    #[tokio::test]
    async fn invalid_goal_never_reaches_the_api() {
        let api = Arc::new(FakeApi::default());
        let cache = QueryCache::new();
        warm(&cache, &api).await;

        let err = executor(&api, &cache)
            .create_goal(&"a".repeat(36), 3)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(api.writes.lock().unwrap().is_empty());
        assert!(!cache.is_stale(&QueryKey::summary()).await);
    }

    #[tokio::test]
    async fn undo_and_create_goal_go_through_the_api() {
        let api = Arc::new(FakeApi::default());
        let cache = QueryCache::new();
        let executor = executor(&api, &cache);

        executor.undo_completion("c9").await.unwrap();
        executor.create_goal("  Meditate ", 7).await.unwrap();

        assert_eq!(
            *api.writes.lock().unwrap(),
            vec!["undo:c9".to_string(), "goal:Meditate:7".to_string()]
        );
    }

    #[tokio::test]
    async fn run_returns_the_write_value() {
        let api = Arc::new(FakeApi::default());
        let cache = QueryCache::new();
        let value = executor(&api, &cache)
            .run("custom", async { Ok::<_, ApiError>(42) })
            .await
            .unwrap();
        assert_eq!(value, 42);
    }
}
