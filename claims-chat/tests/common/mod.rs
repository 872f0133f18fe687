#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use claims_chat::chat::SessionRegistry;
use claims_chat::config::UiSettings;
use claims_chat::models::{
    BackendHealth, IngestResponse, QueryRequest, QueryResponse, ResponseMetadata, Source,
};
use claims_chat::services::{ClientError, RagBackend};
use claims_chat::startup::build_router;
use claims_chat::AppState;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use tower::ServiceExt;

/// Backend double with fixed replies. Calls block on `gate` until a permit
/// is available, which lets tests observe the in-flight state.
pub struct ScriptedBackend {
    pub query_reply: Result<QueryResponse, StatusCode>,
    pub ingest_reply: Result<u64, StatusCode>,
    pub healthy: bool,
    pub gate: Arc<Semaphore>,
    pub received: Mutex<Vec<QueryRequest>>,
    pub ingest_calls: Mutex<u32>,
}

impl ScriptedBackend {
    pub fn answering(response: QueryResponse) -> Self {
        Self {
            query_reply: Ok(response),
            ingest_reply: Ok(0),
            healthy: true,
            gate: Arc::new(Semaphore::new(Semaphore::MAX_PERMITS)),
            received: Mutex::new(Vec::new()),
            ingest_calls: Mutex::new(0),
        }
    }

    pub fn failing(status: StatusCode) -> Self {
        Self {
            query_reply: Err(status),
            ingest_reply: Err(status),
            healthy: false,
            ..Self::answering(claims_found())
        }
    }

    pub fn ingesting(num_records: u64) -> Self {
        Self {
            ingest_reply: Ok(num_records),
            ..Self::answering(claims_found())
        }
    }

    /// Hold every call until `release` is called.
    pub fn gated(mut self) -> Self {
        self.gate = Arc::new(Semaphore::new(0));
        self
    }

    pub fn release(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }

    pub fn received(&self) -> Vec<QueryRequest> {
        self.received.lock().unwrap().clone()
    }

    async fn wait_for_gate(&self) {
        let _permit = self.gate.acquire().await.expect("gate closed");
    }
}

#[async_trait]
impl RagBackend for ScriptedBackend {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ClientError> {
        self.received.lock().unwrap().push(request.clone());
        self.wait_for_gate().await;

        self.query_reply.clone().map_err(|status| ClientError::Status {
            operation: "Query",
            status,
        })
    }

    async fn ingest(&self) -> Result<IngestResponse, ClientError> {
        *self.ingest_calls.lock().unwrap() += 1;
        self.wait_for_gate().await;

        self.ingest_reply
            .map(|num_records| IngestResponse {
                num_records,
                message: None,
                num_chunks: None,
            })
            .map_err(|status| ClientError::Status {
                operation: "Ingest",
                status,
            })
    }

    async fn health(&self) -> Result<BackendHealth, ClientError> {
        if self.healthy {
            Ok(BackendHealth {
                status: "ok".to_string(),
                index_size: Some(7),
            })
        } else {
            Err(ClientError::Decode("backend offline".to_string()))
        }
    }
}

/// The `3 claims found` reply used throughout the scenarios.
pub fn claims_found() -> QueryResponse {
    QueryResponse {
        answer: "3 claims found".to_string(),
        sources: Some(vec![Source {
            claim_id: Some("C-1".to_string()),
            retrieval_score: 0.8231,
            excerpt: "Claim C-1 denied for diabetes".to_string(),
        }]),
        metadata: Some(ResponseMetadata {
            processing_latency: 0.042,
            llm_type: "mock".to_string(),
        }),
    }
}

/// Router under test plus a cookie jar holding one browser session.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
    pub backend: Arc<ScriptedBackend>,
}

impl TestApp {
    pub fn new(backend: ScriptedBackend) -> Self {
        let backend = Arc::new(backend);
        let state = AppState::new(
            backend.clone(),
            Arc::new(SessionRegistry::new()),
            UiSettings::default(),
        );

        Self {
            router: build_router(state, 60),
            cookie: None,
            backend,
        }
    }

    /// Same server, fresh browser.
    pub fn new_browser(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
            backend: self.backend.clone(),
        }
    }

    pub async fn send(&mut self, mut request: Request<Body>) -> Response {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        response
    }

    pub async fn get(&mut self, uri: &str) -> (StatusCode, String) {
        let response = self
            .send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await;
        let status = response.status();
        (status, body_text(response).await)
    }

    pub async fn post_form(&mut self, uri: &str, body: &str) -> Response {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn state(&mut self) -> serde_json::Value {
        let (status, body) = self.get("/chat/state").await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_str(&body).unwrap()
    }

    /// Poll the chat until neither busy flag is set.
    pub async fn wait_idle(&mut self) -> serde_json::Value {
        for _ in 0..200 {
            let state = self.state().await;
            if state["query_busy"] == false && state["ingest_busy"] == false {
                return state;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("chat never became idle");
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
