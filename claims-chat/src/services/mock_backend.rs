//! In-process backend for running the frontend without the RAG service.

use super::rag_client::{ClientError, RagBackend};
use crate::models::{
    BackendHealth, IngestResponse, QueryRequest, QueryResponse, ResponseMetadata, Source,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Canned claims corpus searched by keyword overlap.
const CLAIMS: &[(&str, &str)] = &[
    (
        "CLM-1001",
        "Claim CLM-1001: Denied. Specialty Endocrinology. Diagnosis Type 2 diabetes. Reason: medical necessity not established.",
    ),
    (
        "CLM-1002",
        "Claim CLM-1002: Approved. Specialty Cardiology. Diagnosis hypertension. Amount 12,400.",
    ),
    (
        "CLM-1003",
        "Claim CLM-1003: Denied. Specialty Endocrinology. Diagnosis diabetes with complications. Reason: missing prior authorization.",
    ),
    (
        "CLM-1004",
        "Claim CLM-1004: Pending. Specialty Orthopedics. Diagnosis knee osteoarthritis. Patient P_12345.",
    ),
    (
        "CLM-1005",
        "Claim CLM-1005: Denied. Specialty Cardiology. Diagnosis arrhythmia. Reason: medical necessity.",
    ),
];

pub struct MockRagBackend {
    ingested: AtomicU64,
}

impl MockRagBackend {
    pub fn new() -> Self {
        Self {
            ingested: AtomicU64::new(0),
        }
    }

    fn score(query: &str, text: &str) -> f64 {
        let text = text.to_lowercase();
        let terms: Vec<String> = query
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|t| t.len() > 2)
            .map(str::to_lowercase)
            .collect();

        if terms.is_empty() {
            return 0.0;
        }

        let hits = terms.iter().filter(|t| text.contains(t.as_str())).count();
        hits as f64 / terms.len() as f64
    }
}

impl Default for MockRagBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RagBackend for MockRagBackend {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ClientError> {
        let started = Instant::now();

        let mut ranked: Vec<(f64, &str, &str)> = CLAIMS
            .iter()
            .map(|(id, text)| (Self::score(&request.query, text), *id, *text))
            .filter(|(score, _, _)| *score > 0.0)
            .collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
        ranked.truncate(request.k as usize);

        let answer = if ranked.is_empty() {
            "No matching claims were found.".to_string()
        } else {
            format!("{} claims found", ranked.len())
        };

        let sources = ranked
            .into_iter()
            .map(|(score, id, text)| Source {
                claim_id: Some(id.to_string()),
                retrieval_score: score,
                excerpt: text.to_string(),
            })
            .collect();

        Ok(QueryResponse {
            answer,
            sources: Some(sources),
            metadata: Some(ResponseMetadata {
                processing_latency: started.elapsed().as_secs_f64(),
                llm_type: "mock".to_string(),
            }),
        })
    }

    async fn ingest(&self) -> Result<IngestResponse, ClientError> {
        self.ingested
            .store(CLAIMS.len() as u64, Ordering::SeqCst);

        Ok(IngestResponse {
            num_records: CLAIMS.len() as u64,
            message: Some("Ingestion complete".to_string()),
            num_chunks: Some(CLAIMS.len() as u64),
        })
    }

    async fn health(&self) -> Result<BackendHealth, ClientError> {
        Ok(BackendHealth {
            status: "ok".to_string(),
            index_size: Some(self.ingested.load(Ordering::SeqCst)),
        })
    }
}
