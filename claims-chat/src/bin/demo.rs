//! Batch demo: wait for the backend, re-ingest, run the sample questions
//! through a chat session and save the replies as JSON.

use claims_chat::chat::ChatSession;
use claims_chat::config::get_configuration;
use claims_chat::models::Message;
use claims_chat::services::RagBackend;
use claims_chat::startup::build_backend;
use serde::Serialize;
use service_core::observability::init_tracing;
use std::path::Path;
use std::time::{Duration, Instant};

const OUTPUT_FILE: &str = "outputs/demo_results.json";
const HEALTH_ATTEMPTS: u32 = 30;
const HEALTH_INTERVAL: Duration = Duration::from_secs(2);

const QUERIES: &[&str] = &[
    "Show me denied claims for diabetes patients last quarter.",
    "List claims denied for 'medical necessity' in 2024 with amount > 10,000.",
    "Which doctors have the highest denial rate for cardiology claims in 2023?",
    "Show me all pending claims for patient with ID P_12345.",
];

#[derive(Serialize)]
struct DemoResult {
    query: String,
    reply: Message,
    latency_seconds: f64,
}

#[derive(Serialize)]
struct DemoReport {
    generated_at: chrono::DateTime<chrono::Utc>,
    results: Vec<DemoResult>,
}

async fn wait_for_backend(backend: &dyn RagBackend) -> bool {
    tracing::info!("Waiting for backend to come online");

    for attempt in 1..=HEALTH_ATTEMPTS {
        match backend.health().await {
            Ok(health) => {
                tracing::info!(status = %health.status, index_size = ?health.index_size, "Backend is online");
                return true;
            }
            Err(e) => {
                tracing::debug!(attempt, error = %e, "Backend not ready");
                tokio::time::sleep(HEALTH_INTERVAL).await;
            }
        }
    }

    false
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let configuration =
        get_configuration().map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    init_tracing("claims-chat-demo", &configuration.telemetry)?;

    let backend = build_backend(&configuration);

    if !wait_for_backend(backend.as_ref()).await {
        anyhow::bail!("Backend failed to start");
    }

    let mut session = ChatSession::new();

    tracing::info!("Triggering ingestion");
    let notice = session.trigger_ingest(backend.as_ref()).await;
    tracing::info!(success = notice.success, "{}", notice.text);

    let mut results = Vec::with_capacity(QUERIES.len());
    for query in QUERIES {
        session.set_draft(*query);

        let started = Instant::now();
        session.submit_query(backend.as_ref()).await;
        let latency_seconds = started.elapsed().as_secs_f64();

        let Some(reply) = session.transcript().last().cloned() else {
            continue;
        };
        tracing::info!(query = %query, role = reply.role.as_str(), answer = %reply.content, latency_seconds, "Query answered");

        results.push(DemoResult {
            query: query.to_string(),
            reply,
            latency_seconds,
        });
    }

    let report = DemoReport {
        generated_at: chrono::Utc::now(),
        results,
    };

    if let Some(dir) = Path::new(OUTPUT_FILE).parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(OUTPUT_FILE, serde_json::to_vec_pretty(&report)?).await?;
    tracing::info!(path = OUTPUT_FILE, "Demo complete");

    Ok(())
}
