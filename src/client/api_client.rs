//! HTTP client for the swipe API

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::api::routes::UserResponse;
use crate::auth::SessionUser;
use crate::models::{CreateRecordRequest, Record, VoteKind, VoteRequest, VoteResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status, with the server's `error` message when it sent one
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http(e) => e.status(),
            ClientError::Api { status, .. } => StatusCode::from_u16(*status).ok(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Talks to `/records`, `/votes` and `/user`
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            client,
        })
    }

    /// Send `token` as a bearer credential on every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn list_records(&self) -> Result<Vec<Record>> {
        let request = self.authorized(self.client.get(self.url("/records")));
        handle_response(request.send().await?).await
    }

    pub async fn create_record(&self, body: &CreateRecordRequest) -> Result<Record> {
        let request = self.authorized(self.client.post(self.url("/records")).json(body));
        handle_response(request.send().await?).await
    }

    /// Returns the record's confidence as recomputed by the server
    pub async fn submit_vote(&self, record_id: &str, kind: VoteKind) -> Result<i64> {
        let body = VoteRequest {
            record_id: Some(record_id.to_string()),
            vote: Some(kind.as_str().to_string()),
        };
        let request = self.authorized(self.client.post(self.url("/votes")).json(&body));
        let response: VoteResponse = handle_response(request.send().await?).await?;
        debug!(record_id, vote = %kind, confidence = response.confidence, "vote acknowledged");
        Ok(response.confidence)
    }

    pub async fn current_user(&self) -> Result<Option<SessionUser>> {
        let request = self.authorized(self.client.get(self.url("/user")));
        let response: UserResponse = handle_response(request.send().await?).await?;
        Ok(response.user)
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json().await?)
}
