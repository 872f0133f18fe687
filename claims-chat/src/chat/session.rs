//! Chat session state machine.
//!
//! A session owns the transcript, the draft text and the two busy flags.
//! Each backend interaction is split into a `begin_*` step that runs before
//! the call and a `complete_*` step that folds the outcome back in, so callers
//! can release the session while the request is outstanding.

use crate::models::{IngestResponse, Message, QueryRequest, QueryResponse};
use crate::services::{ClientError, RagBackend};
use serde::Serialize;

pub const GREETING: &str = "Hello! I can answer questions about claims. Try asking \"Show me denied claims for diabetes\".";

const GENERIC_FAILURE: &str = "Something went wrong";

/// One-shot message surfaced to the user outside the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub text: String,
    pub success: bool,
}

impl Notification {
    fn ingest_succeeded(num_records: u64) -> Self {
        Self {
            text: format!("Ingestion Complete! Processed {} records.", num_records),
            success: true,
        }
    }

    fn ingest_failed() -> Self {
        Self {
            text: "Ingestion failed.".to_string(),
            success: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    transcript: Vec<Message>,
    draft: String,
    query_busy: bool,
    ingest_busy: bool,
    #[serde(skip)]
    notice: Option<Notification>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// A fresh session seeded with the greeting.
    pub fn new() -> Self {
        Self {
            transcript: vec![Message::system(GREETING)],
            draft: String::new(),
            query_busy: false,
            ingest_busy: false,
            notice: None,
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn is_query_busy(&self) -> bool {
        self.query_busy
    }

    pub fn is_ingest_busy(&self) -> bool {
        self.ingest_busy
    }

    /// Start a query from the current draft.
    ///
    /// Returns `None` and changes nothing when the trimmed draft is empty.
    /// Otherwise appends the user message, clears the draft, raises the query
    /// busy flag and returns the request to send. An earlier query still in
    /// flight does not prevent a new one.
    pub fn begin_query(&mut self) -> Option<QueryRequest> {
        let text = self.draft.trim();
        if text.is_empty() {
            return None;
        }

        let text = text.to_string();
        self.transcript.push(Message::user(text.clone()));
        self.draft.clear();
        self.query_busy = true;

        Some(QueryRequest::new(text))
    }

    /// Append the follow-up for a query and lower the busy flag.
    pub fn complete_query(&mut self, outcome: Result<QueryResponse, ClientError>) {
        let message = match outcome {
            Ok(response) => Message::assistant(response.answer, response.sources, response.metadata),
            Err(err) => {
                tracing::warn!(error = %err, "Query failed");
                Message::error(query_error_text(&err))
            }
        };

        self.transcript.push(message);
        self.query_busy = false;
    }

    /// Run a whole query against `backend`. Returns whether a request was sent.
    pub async fn submit_query(&mut self, backend: &dyn RagBackend) -> bool {
        let Some(request) = self.begin_query() else {
            return false;
        };

        let outcome = backend.query(&request).await;
        self.complete_query(outcome);
        true
    }

    pub fn begin_ingest(&mut self) {
        self.ingest_busy = true;
    }

    /// Lower the ingest busy flag and produce the notification for the outcome.
    /// The transcript is never touched.
    pub fn complete_ingest(&mut self, outcome: Result<IngestResponse, ClientError>) -> Notification {
        self.ingest_busy = false;

        match outcome {
            Ok(response) => {
                tracing::info!(num_records = response.num_records, "Ingestion complete");
                Notification::ingest_succeeded(response.num_records)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Ingestion failed");
                Notification::ingest_failed()
            }
        }
    }

    /// Run a whole ingest against `backend`.
    pub async fn trigger_ingest(&mut self, backend: &dyn RagBackend) -> Notification {
        self.begin_ingest();
        let outcome = backend.ingest().await;
        self.complete_ingest(outcome)
    }

    /// Hold a notification until the next render.
    pub fn post_notice(&mut self, notice: Notification) {
        self.notice = Some(notice);
    }

    pub fn take_notice(&mut self) -> Option<Notification> {
        self.notice.take()
    }
}

fn query_error_text(err: &ClientError) -> String {
    let reason = err.to_string();
    let reason = if reason.trim().is_empty() {
        GENERIC_FAILURE
    } else {
        reason.as_str()
    };

    format!("Error: {}. Check console/backend.", reason)
}
