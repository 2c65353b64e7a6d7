//! HTTP client for the remote goals API.
//!
//! Every operation is a single request with no retry. Responses are decoded
//! by the `decode_*` functions so malformed payloads surface as
//! [`ApiError::Decode`] at this boundary.

use crate::errors::ApiError;
use crate::models::{
    CreateCompletionRequest, NewGoal, PendingGoal, PendingGoalsPayload, Summary, SummaryEnvelope,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn fetch_summary(&self) -> Result<Summary, ApiError>;

    async fn fetch_pending_goals(&self) -> Result<Vec<PendingGoal>, ApiError>;

    async fn create_goal(&self, goal: &NewGoal) -> Result<(), ApiError>;

    async fn create_completion(&self, goal_id: &str) -> Result<(), ApiError>;

    async fn delete_completion(&self, completion_id: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Validates locally, then posts the goal.
    pub async fn create_goal_from(
        &self,
        title: &str,
        desired_weekly_frequency: i64,
    ) -> Result<(), ApiError> {
        let goal = NewGoal::new(title, desired_weekly_frequency)?;
        self.create_goal(&goal).await
    }
}

async fn read_body(response: Response) -> Result<Vec<u8>, ApiError> {
    let response = response.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

async fn expect_success(response: Response) -> Result<(), ApiError> {
    response.error_for_status()?;
    Ok(())
}

#[async_trait]
impl RemoteApi for HttpApi {
    async fn fetch_summary(&self) -> Result<Summary, ApiError> {
        debug!("GET {}", self.url("summary"));
        let response = self.client.get(self.url("summary")).send().await?;
        decode_summary(&read_body(response).await?)
    }

    async fn fetch_pending_goals(&self) -> Result<Vec<PendingGoal>, ApiError> {
        debug!("GET {}", self.url("pending-goals"));
        let response = self.client.get(self.url("pending-goals")).send().await?;
        decode_pending_goals(&read_body(response).await?)
    }

    async fn create_goal(&self, goal: &NewGoal) -> Result<(), ApiError> {
        let response = self.client.post(self.url("goals")).json(goal).send().await?;
        expect_success(response).await
    }

    async fn create_completion(&self, goal_id: &str) -> Result<(), ApiError> {
        let body = CreateCompletionRequest {
            goal_id: goal_id.to_string(),
        };
        let response = self
            .client
            .post(self.url("completions"))
            .json(&body)
            .send()
            .await?;
        expect_success(response).await
    }

    async fn delete_completion(&self, completion_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&completion_path(completion_id)))
            .send()
            .await?;
        expect_success(response).await
    }
}

/// Path of one completion, with the id encoded as a single segment.
pub fn completion_path(completion_id: &str) -> String {
    format!("completions/{}", urlencoding::encode(completion_id))
}

pub fn decode_summary(bytes: &[u8]) -> Result<Summary, ApiError> {
    let envelope: SummaryEnvelope = serde_json::from_slice(bytes)?;
    let summary = envelope.summary;
    if summary.completed > summary.total {
        return Err(ApiError::decode(format!(
            "summary reports {} completed out of {} total",
            summary.completed, summary.total
        )));
    }
    Ok(summary)
}

pub fn decode_pending_goals(bytes: &[u8]) -> Result<Vec<PendingGoal>, ApiError> {
    let payload: PendingGoalsPayload = serde_json::from_slice(bytes)?;
    Ok(payload.into_goals())
}
