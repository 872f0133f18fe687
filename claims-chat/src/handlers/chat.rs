use crate::chat::{ActiveChat, ChatSession};
use crate::services::metrics;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Json, Redirect},
    Form,
};
use serde::Deserialize;
use tracing::Instrument;

#[derive(Deserialize)]
pub struct QueryForm {
    #[serde(default)]
    pub draft: String,
}

/// Submit the posted draft. The backend call runs in the background so the
/// page (with its thinking indicator) renders immediately.
pub async fn submit_query(
    State(state): State<AppState>,
    active: ActiveChat,
    Form(form): Form<QueryForm>,
) -> Redirect {
    let request = {
        let mut chat = active.chat.lock().await;
        chat.set_draft(form.draft);
        chat.begin_query()
    };

    let Some(request) = request else {
        tracing::debug!(chat_id = %active.id, "Ignoring empty query");
        return Redirect::to("/#latest");
    };

    let backend = state.backend.clone();
    let chat = active.chat.clone();
    let span = tracing::info_span!("chat_query", chat_id = %active.id);

    tokio::spawn(
        async move {
            let outcome = backend.query(&request).await;
            metrics::record_backend_call("query", outcome.is_ok());
            chat.lock().await.complete_query(outcome);
        }
        .instrument(span),
    );

    Redirect::to("/#latest")
}

/// Start re-ingestion unless one is already running for this chat.
pub async fn trigger_ingest(State(state): State<AppState>, active: ActiveChat) -> Redirect {
    let started = {
        let mut chat = active.chat.lock().await;
        if chat.is_ingest_busy() {
            false
        } else {
            chat.begin_ingest();
            true
        }
    };

    if !started {
        tracing::debug!(chat_id = %active.id, "Ingest already in flight");
        return Redirect::to("/");
    }

    let backend = state.backend.clone();
    let chat = active.chat.clone();
    let span = tracing::info_span!("chat_ingest", chat_id = %active.id);

    tokio::spawn(
        async move {
            let outcome = backend.ingest().await;
            metrics::record_backend_call("ingest", outcome.is_ok());

            let mut chat = chat.lock().await;
            let notice = chat.complete_ingest(outcome);
            chat.post_notice(notice);
        }
        .instrument(span),
    );

    Redirect::to("/")
}

/// Store the draft typed while a backend call was in flight. The busy page
/// posts it here right before reloading.
pub async fn save_draft(active: ActiveChat, Form(form): Form<QueryForm>) -> StatusCode {
    active.chat.lock().await.set_draft(form.draft);
    StatusCode::NO_CONTENT
}

/// JSON snapshot of the caller's chat.
pub async fn chat_state(active: ActiveChat) -> Json<ChatSession> {
    let chat = active.chat.lock().await;
    Json(chat.clone())
}
