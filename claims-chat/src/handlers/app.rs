use crate::chat::{transcript_views, ActiveChat, MessageView, Notification};
use crate::models::BackendHealth;
use crate::AppState;
use askama::Template;
use axum::{extract::State, response::IntoResponse, Json};
use service_core::error::AppError;

/// Shell page with the chat panel mounted in its content region.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: String,
    pub subtitle: String,
    pub messages: Vec<MessageView>,
    pub draft: String,
    pub query_busy: bool,
    pub ingest_busy: bool,
    pub notice: Option<Notification>,
}

pub async fn index(State(state): State<AppState>, active: ActiveChat) -> impl IntoResponse {
    let mut chat = active.chat.lock().await;

    IndexTemplate {
        title: state.ui.title.clone(),
        subtitle: state.ui.subtitle.clone(),
        messages: transcript_views(chat.transcript()),
        draft: chat.draft().to_string(),
        query_busy: chat.is_query_busy(),
        ingest_busy: chat.is_ingest_busy(),
        notice: chat.take_notice(),
    }
}

pub async fn health_check() -> &'static str {
    "OK"
}

/// Report whether the RAG backend answers its health endpoint.
pub async fn backend_health(State(state): State<AppState>) -> Result<Json<BackendHealth>, AppError> {
    let health = state.backend.health().await.map_err(|e| {
        tracing::warn!(error = %e, "Backend health check failed");
        AppError::BadGateway(e.to_string())
    })?;

    Ok(Json(health))
}
