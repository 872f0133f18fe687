//! Client for the RAG backend HTTP API.
//!
//! The backend is treated as an opaque collaborator behind the [`RagBackend`]
//! trait so the chat session can run against HTTP or an in-process mock.

use crate::config::BackendSettings;
use crate::models::{BackendHealth, IngestResponse, QueryRequest, QueryResponse};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use service_core::observability::TracedClientExt;
use thiserror::Error;

/// Failure of a backend call.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{operation} failed with status {status}")]
    Status {
        operation: &'static str,
        status: StatusCode,
    },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Decode(String),
}

#[async_trait]
pub trait RagBackend: Send + Sync {
    /// `POST /query`. Any non-2xx status is a failure.
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ClientError>;

    /// `POST /ingest` with no body. Any non-2xx status is a failure.
    async fn ingest(&self) -> Result<IngestResponse, ClientError>;

    /// `GET /health`.
    async fn health(&self) -> Result<BackendHealth, ClientError>;
}

pub struct HttpRagBackend {
    client: Client,
    settings: BackendSettings,
}

impl HttpRagBackend {
    pub fn new(settings: BackendSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    async fn read_json<T: DeserializeOwned>(
        operation: &'static str,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { operation, status });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            ClientError::Decode(format!("{} returned an unexpected body: {}", operation, e))
        })
    }
}

#[async_trait]
impl RagBackend for HttpRagBackend {
    #[tracing::instrument(skip(self, request), fields(query_len = request.query.len(), k = request.k))]
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ClientError> {
        let url = self.settings.endpoint("/query");

        let response = self
            .client
            .traced_post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                ClientError::Transport(e)
            })?;

        Self::read_json("Query", response).await
    }

    #[tracing::instrument(skip(self))]
    async fn ingest(&self) -> Result<IngestResponse, ClientError> {
        let url = self.settings.endpoint("/ingest");

        let response = self.client.traced_post(&url).send().await.map_err(|e| {
            tracing::error!("Failed to send POST request to {}: {}", url, e);
            ClientError::Transport(e)
        })?;

        Self::read_json("Ingest", response).await
    }

    async fn health(&self) -> Result<BackendHealth, ClientError> {
        let url = self.settings.endpoint("/health");

        let response = self.client.traced_get(&url).send().await?;

        Self::read_json("Health check", response).await
    }
}
