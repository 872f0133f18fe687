mod common;

use axum::http::{header, StatusCode};
use common::{claims_found, ScriptedBackend, TestApp};

#[tokio::test]
async fn fresh_session_shows_greeting_shell() {
    let mut app = TestApp::new(ScriptedBackend::answering(claims_found()));

    let (status, body) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("RAG Claims Assistant"));
    assert!(body.contains("Connected to Local/Mock LLM"));
    assert!(body.contains("Hello! I can answer questions about claims."));
    assert!(body.contains("id=\"latest\""));
    assert!(!body.contains("Thinking..."));

    let state = app.state().await;
    assert_eq!(state["transcript"].as_array().unwrap().len(), 1);
    assert_eq!(state["transcript"][0]["role"], "system");
}

#[tokio::test]
async fn query_round_trip_renders_answer_sources_and_footer() {
    let mut app = TestApp::new(ScriptedBackend::answering(claims_found()));

    let response = app
        .post_form("/chat/query", "draft=Show+me+denied+claims+for+diabetes")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/#latest");

    let state = app.wait_idle().await;
    let transcript = state["transcript"].as_array().unwrap();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[1]["role"], "user");
    assert_eq!(transcript[1]["content"], "Show me denied claims for diabetes");
    assert_eq!(transcript[2]["role"], "assistant");
    assert_eq!(state["draft"], "");

    let (_, body) = app.get("/").await;
    assert!(body.contains("3 claims found"));
    assert!(body.contains("Sources (1)"));
    assert!(body.contains("Claim: C-1 (Score: 0.82)"));
    assert!(body.contains("Claim C-1 denied for diabetes"));
    assert!(body.contains("Latency: 0.042s | Model: mock"));

    let sent = app.backend.received();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].query, "Show me denied claims for diabetes");
    assert_eq!(sent[0].k, 5);
}

#[tokio::test]
async fn draft_is_trimmed_before_sending() {
    let mut app = TestApp::new(ScriptedBackend::answering(claims_found()));

    app.post_form("/chat/query", "draft=++pending+claims++").await;
    let state = app.wait_idle().await;

    assert_eq!(state["transcript"][1]["content"], "pending claims");
    assert_eq!(app.backend.received()[0].query, "pending claims");
}

#[tokio::test]
async fn blank_draft_is_ignored_and_kept() {
    let mut app = TestApp::new(ScriptedBackend::answering(claims_found()));

    let response = app.post_form("/chat/query", "draft=+++").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let state = app.state().await;
    assert_eq!(state["transcript"].as_array().unwrap().len(), 1);
    assert_eq!(state["draft"], "   ");
    assert_eq!(state["query_busy"], false);
    assert!(app.backend.received().is_empty());

    let (_, body) = app.get("/").await;
    assert!(body.contains("value=\"   \""));
}

#[tokio::test]
async fn busy_flag_and_thinking_indicator_cover_the_request() {
    let mut app = TestApp::new(ScriptedBackend::answering(claims_found()).gated());

    app.post_form("/chat/query", "draft=denied+claims").await;

    let state = app.state().await;
    assert_eq!(state["query_busy"], true);
    assert_eq!(state["transcript"].as_array().unwrap().len(), 2);

    let (_, body) = app.get("/").await;
    assert!(body.contains("Thinking..."));
    assert!(body.contains("fetch(\"/chat/state\""));
    assert!(!body.contains("http-equiv=\"refresh\""));

    app.backend.release();
    let state = app.wait_idle().await;
    assert_eq!(state["transcript"].as_array().unwrap().len(), 3);

    let (_, body) = app.get("/").await;
    assert!(!body.contains("Thinking..."));
    assert!(!body.contains("fetch(\"/chat/state\""));
}

#[tokio::test]
async fn draft_typed_while_busy_survives_completion() {
    let mut app = TestApp::new(ScriptedBackend::answering(claims_found()).gated());

    app.post_form("/chat/query", "draft=denied+claims").await;
    let (_, body) = app.get("/").await;
    assert!(body.contains("value=\"\""));

    // What the busy page posts right before it reloads.
    let response = app.post_form("/chat/draft", "draft=and+pending+ones").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    app.backend.release();
    let state = app.wait_idle().await;
    assert_eq!(state["draft"], "and pending ones");
    assert_eq!(state["transcript"].as_array().unwrap().len(), 3);

    let (_, body) = app.get("/").await;
    assert!(body.contains("value=\"and pending ones\""));
}

#[tokio::test]
async fn query_submitted_while_busy_is_still_sent() {
    let mut app = TestApp::new(ScriptedBackend::answering(claims_found()).gated());

    app.post_form("/chat/query", "draft=first").await;
    let (_, body) = app.get("/").await;
    assert!(body.contains("composer.submit()"));

    app.post_form("/chat/query", "draft=second").await;
    let state = app.state().await;
    assert_eq!(state["transcript"].as_array().unwrap().len(), 3);

    app.backend.release();
    let state = app.wait_idle().await;
    assert_eq!(state["transcript"].as_array().unwrap().len(), 5);
    assert_eq!(app.backend.received().len(), 2);
}

#[tokio::test]
async fn backend_error_becomes_error_entry() {
    let mut app = TestApp::new(ScriptedBackend::failing(StatusCode::INTERNAL_SERVER_ERROR));

    app.post_form("/chat/query", "draft=denied+claims").await;
    let state = app.wait_idle().await;

    let transcript = state["transcript"].as_array().unwrap();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[2]["role"], "error");
    let content = transcript[2]["content"].as_str().unwrap();
    assert!(content.starts_with("Error:"));
    assert!(content.contains("Check console/backend."));
    assert!(transcript[2].get("sources").is_none());
    assert_eq!(state["query_busy"], false);

    // The session keeps working after a failure.
    app.post_form("/chat/query", "draft=again").await;
    let state = app.wait_idle().await;
    assert_eq!(state["transcript"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn ingest_notifies_once_and_leaves_transcript_alone() {
    let mut app = TestApp::new(ScriptedBackend::ingesting(42));

    let response = app.post_form("/chat/ingest", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let state = app.wait_idle().await;
    assert_eq!(state["transcript"].as_array().unwrap().len(), 1);
    assert_eq!(state["ingest_busy"], false);

    let (_, body) = app.get("/").await;
    assert!(body.contains("Ingestion Complete! Processed 42 records."));
    assert!(body.contains("<dialog open"));

    let (_, body) = app.get("/").await;
    assert!(!body.contains("Processed 42 records"));
}

#[tokio::test]
async fn ingest_failure_shows_generic_notice() {
    let mut app = TestApp::new(ScriptedBackend::failing(StatusCode::BAD_GATEWAY));

    app.post_form("/chat/ingest", "").await;
    app.wait_idle().await;

    let (_, body) = app.get("/").await;
    assert!(body.contains("Ingestion failed."));
    assert_eq!(app.state().await["transcript"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn second_ingest_while_busy_is_not_sent() {
    let mut app = TestApp::new(ScriptedBackend::ingesting(3).gated());

    app.post_form("/chat/ingest", "").await;
    let (_, body) = app.get("/").await;
    assert!(body.contains("Processing..."));

    app.post_form("/chat/ingest", "").await;
    assert_eq!(app.state().await["ingest_busy"], true);

    app.backend.release();
    app.wait_idle().await;
    assert_eq!(*app.backend.ingest_calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn browsers_do_not_share_transcripts() {
    let mut first = TestApp::new(ScriptedBackend::answering(claims_found()));
    first.post_form("/chat/query", "draft=denied+claims").await;
    first.wait_idle().await;

    let mut second = first.new_browser();
    let state = second.state().await;
    assert_eq!(state["transcript"].as_array().unwrap().len(), 1);
    assert_eq!(first.state().await["transcript"].as_array().unwrap().len(), 3);
}
