//! Request and response bodies of the RAG backend HTTP API.

use super::message::{ResponseMetadata, Source};
use serde::{Deserialize, Serialize};

/// Retrieval breadth sent with every query.
pub const RETRIEVAL_K: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub k: u32,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            k: RETRIEVAL_K,
        }
    }
}

/// Body of a successful `POST /query`. Extra metadata keys the backend adds
/// (embedding model, applied filters) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Option<Vec<Source>>,
    #[serde(default)]
    pub metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub num_records: u64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub num_chunks: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendHealth {
    pub status: String,
    #[serde(default)]
    pub index_size: Option<u64>,
}
