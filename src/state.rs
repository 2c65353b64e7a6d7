use crate::api::RemoteApi;
use crate::cache::{QueryCache, QueryKey, QueryState};
use crate::config::Locale;
use crate::models::{PendingGoal, Summary};
use crate::mutations::MutationExecutor;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn RemoteApi>,
    pub cache: QueryCache,
    pub mutations: MutationExecutor,
    pub locale: Locale,
}

impl AppState {
    pub fn new(api: Arc<dyn RemoteApi>, cache: QueryCache, locale: Locale) -> Self {
        let mutations = MutationExecutor::new(Arc::clone(&api), cache.clone());
        Self {
            api,
            cache,
            mutations,
            locale,
        }
    }

    pub async fn summary(&self) -> QueryState<Summary> {
        let api = Arc::clone(&self.api);
        self.cache
            .get(&QueryKey::summary(), move || async move { api.fetch_summary().await })
            .await
    }

    pub async fn observe_summary(&self) -> QueryState<Summary> {
        let api = Arc::clone(&self.api);
        self.cache
            .observe(&QueryKey::summary(), move || async move { api.fetch_summary().await })
            .await
    }

    pub async fn pending_goals(&self) -> QueryState<Vec<PendingGoal>> {
        let api = Arc::clone(&self.api);
        self.cache
            .get(&QueryKey::pending_goals(), move || async move {
                api.fetch_pending_goals().await
            })
            .await
    }
}
