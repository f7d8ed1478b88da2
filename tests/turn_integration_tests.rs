//! End-to-end turns: reducer + turn driver + streaming provider against a mock backend.

use std::sync::Arc;

use parley::core::action::{Action, Effect, update};
use parley::core::conversation::Message;
use parley::core::state::App;
use parley::core::turn::{TurnRequest, stream_turn};
use parley::inference::ResponsesProvider;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn text_stream(fragments: &[&str]) -> ResponseTemplate {
    let mut body = String::from("event: response.created\ndata: {\"type\":\"response.created\"}\n\n");
    for fragment in fragments {
        body.push_str(&format!(
            "event: response.output_text.delta\ndata: {}\n\n",
            json!({ "type": "response.output_text.delta", "delta": fragment })
        ));
    }
    body.push_str("event: response.completed\ndata: {\"type\":\"response.completed\"}\n\n");
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/event-stream")
}

fn app_for(server: &MockServer) -> (App, Arc<ResponsesProvider>) {
    let provider = Arc::new(ResponsesProvider::new("ollama", server.uri(), None));
    let app = App::new(provider.clone(), "test-model".to_string());
    (app, provider)
}

fn submit(app: &mut App, text: &str) -> Option<TurnRequest> {
    update(app, Action::InsertText(text.to_string()));
    match update(app, Action::Submit) {
        Effect::SpawnTurn(request) => Some(request),
        _ => None,
    }
}

/// Drives a turn to completion, applying each action as it is emitted.
/// Returns the in-progress text observed after every action.
async fn drive(app: &mut App, provider: &ResponsesProvider, turn: &TurnRequest) -> Vec<String> {
    let mut actions = Vec::new();
    stream_turn(provider, turn, |action| actions.push(action)).await;

    let mut observed = Vec::new();
    for action in actions {
        update(app, action);
        observed.push(app.stream.text().to_string());
    }
    observed
}

// ============================================================================
// Turns
// ============================================================================

#[tokio::test]
async fn single_turn_commits_streamed_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(text_stream(&["Hi", " there", "!"]))
        .expect(1)
        .mount(&server)
        .await;

    let (mut app, provider) = app_for(&server);
    let turn = submit(&mut app, "Hello").expect("turn should start");
    assert!(app.input.is_empty());
    assert_eq!(app.log.messages(), &[Message::user("Hello")]);

    let observed = drive(&mut app, &provider, &turn).await;

    // Each observation extends the previous one until the commit clears it
    let streaming: Vec<&String> = observed.iter().filter(|t| !t.is_empty()).collect();
    assert_eq!(streaming, ["Hi", "Hi there", "Hi there!", "Hi there!"]);
    for pair in streaming.windows(2) {
        assert!(pair[1].starts_with(pair[0].as_str()));
    }

    assert_eq!(
        app.log.messages(),
        &[Message::user("Hello"), Message::assistant("Hi there!")]
    );
    assert!(!app.busy);
    assert_eq!(app.status_message, "Done (9 chars)");
}

#[tokio::test]
async fn empty_submit_never_reaches_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_stream(&["unused"]))
        .expect(0)
        .mount(&server)
        .await;

    let (mut app, _provider) = app_for(&server);
    assert_eq!(update(&mut app, Action::Submit), Effect::None);
    assert!(submit(&mut app, "  \n ").is_none());
    assert!(app.log.is_empty());
    assert!(!app.busy);
}

#[tokio::test]
async fn failed_turn_commits_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let (mut app, provider) = app_for(&server);
    let turn = submit(&mut app, "Hello").expect("turn should start");
    drive(&mut app, &provider, &turn).await;

    assert_eq!(app.log.messages(), &[Message::user("Hello")]);
    assert!(!app.busy);
    let error = app.error.clone().unwrap_or_default();
    assert!(error.contains("status=401"), "got: {error}");
    assert!(app.status_message.starts_with("Error:"));
}

#[tokio::test]
async fn mid_stream_failure_discards_partial_reply() {
    let server = MockServer::start().await;
    let body = "\
event: response.output_text.delta
data: {\"type\":\"response.output_text.delta\",\"delta\":\"Partial\"}

event: response.failed
data: {\"type\":\"response.failed\",\"response\":{\"error\":{\"message\":\"overloaded\"}}}

";
    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/event-stream"),
        )
        .mount(&server)
        .await;

    let (mut app, provider) = app_for(&server);
    let turn = submit(&mut app, "Hello").expect("turn should start");
    let observed = drive(&mut app, &provider, &turn).await;

    assert!(observed.iter().any(|t| t == "Partial"), "partial text was visible");
    assert_eq!(app.log.len(), 1);
    assert_eq!(app.stream.text(), "");
}

#[tokio::test]
async fn each_turn_sends_only_the_latest_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .and(body_partial_json(json!({ "input": "What is Rust?" })))
        .respond_with(text_stream(&["A language."]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .and(body_partial_json(json!({ "input": "Who made it?" })))
        .respond_with(text_stream(&["Graydon Hoare."]))
        .expect(1)
        .mount(&server)
        .await;

    let (mut app, provider) = app_for(&server);
    let first = submit(&mut app, "What is Rust?").expect("first turn");
    drive(&mut app, &provider, &first).await;
    let second = submit(&mut app, "Who made it?").expect("second turn");
    drive(&mut app, &provider, &second).await;

    assert_eq!(app.log.len(), 4);

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2);
    let second_body: Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(second_body["input"], "Who made it?");
    let raw = String::from_utf8_lossy(&requests[1].body);
    assert!(!raw.contains("What is Rust?"), "history must not be replayed");
    assert!(!raw.contains("A language."), "history must not be replayed");
}

#[tokio::test]
async fn submit_while_streaming_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(text_stream(&["ok"]))
        .expect(1)
        .mount(&server)
        .await;

    let (mut app, provider) = app_for(&server);
    let turn = submit(&mut app, "first").expect("turn should start");
    assert!(submit(&mut app, "second").is_none());
    assert_eq!(app.input.as_str(), "second");

    drive(&mut app, &provider, &turn).await;
    assert_eq!(
        app.log.messages(),
        &[Message::user("first"), Message::assistant("ok")]
    );
    assert_eq!(app.input.as_str(), "second", "typed text survives the turn");
}
