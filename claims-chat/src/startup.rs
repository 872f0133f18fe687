use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::middleware::{request_id_middleware, security_headers_middleware};
use service_core::observability::extract_request_id;
use std::sync::Arc;
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::chat::SessionRegistry;
use crate::config::{BackendMode, Settings};
use crate::handlers::{
    app::{backend_health, health_check, index},
    chat::{chat_state, save_draft, submit_query, trigger_ingest},
    metrics::metrics,
};
use crate::middleware::metrics_middleware;
use crate::services::{HttpRagBackend, MockRagBackend, RagBackend};
use crate::AppState;

/// Build the backend collaborator selected by configuration.
pub fn build_backend(settings: &Settings) -> Arc<dyn RagBackend> {
    match settings.backend.mode {
        BackendMode::Http => {
            tracing::info!(url = %settings.backend.url, prefix = %settings.backend.api_prefix, "Using HTTP RAG backend");
            Arc::new(HttpRagBackend::new(settings.backend.clone()))
        }
        BackendMode::Mock => {
            tracing::warn!("Using in-process mock RAG backend");
            Arc::new(MockRagBackend::new())
        }
    }
}

pub fn build_state(settings: &Settings) -> AppState {
    AppState::new(
        build_backend(settings),
        Arc::new(SessionRegistry::new()),
        settings.ui.clone(),
    )
}

pub fn build_router(state: AppState, session_idle_minutes: i64) -> Router {
    // Session setup
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_expiry(Expiry::OnInactivity(Duration::minutes(session_idle_minutes)));

    Router::new()
        .route("/", get(index))
        .route("/chat/query", post(submit_query))
        .route("/chat/ingest", post(trigger_ingest))
        .route("/chat/draft", post(save_draft))
        .route("/chat/state", get(chat_state))
        .route("/health", get(health_check))
        .route("/health/backend", get(backend_health))
        .route("/metrics", get(metrics))
        .route_layer(from_fn(metrics_middleware))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id =
                    extract_request_id(request.headers()).unwrap_or_else(|| "-".to_string());

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Add tracing middleware for request_id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
