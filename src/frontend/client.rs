use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::wire::{ChatReply, ChatRequest};

/// Everything that can go wrong between posting a message and holding a
/// decoded reply.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend answered with status {0}")]
    Status(StatusCode),

    #[error("malformed reply: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait ChatBackend: Send + Sync + 'static {
    async fn send(&self, request: ChatRequest) -> Result<ChatReply, ChatError>;
}

/// Posts chat requests to a fixed endpoint.
///
/// The client keeps its own cookie jar, so one backend per widget instance
/// keeps one conversation session on the server.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBackend {
    pub fn new(endpoint: impl Into<String>) -> Result<HttpBackend, ChatError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(HttpBackend {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send(&self, request: ChatRequest) -> Result<ChatReply, ChatError> {
        debug!(endpoint = %self.endpoint, "posting chat request");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
