//! Integration tests for the fetch-dispatch controller and snapshot projection.
//!
//! The fetcher here hands every request to the test, which decides when and
//! how each one resolves.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::{broadcast, mpsc, oneshot};

use web_action_metadata::HttpMethod;
use web_action_metadata_client::types::*;
use web_action_metadata_client::{
    ClientConfig, FetchDispatchController, Fetcher, Snapshot, StateContainer,
};

// ─────────────────────── helpers ───────────────────────

type Reply = oneshot::Sender<ClientResult<Value>>;

/// A request the controller made, waiting for the test to answer.
struct PendingCall {
    path: String,
    reply: Reply,
}

impl PendingCall {
    fn respond(self, body: Value) {
        let _ = self.reply.send(Ok(body));
    }

    fn fail(self, error: ClientError) {
        let _ = self.reply.send(Err(error));
    }
}

struct ScriptedFetcher {
    calls: mpsc::UnboundedSender<PendingCall>,
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn get_json(&self, path: &str) -> ClientResult<Value> {
        let (reply, rx) = oneshot::channel();
        self.calls
            .send(PendingCall {
                path: path.to_string(),
                reply,
            })
            .map_err(|_| ClientError::Transport("test harness gone".to_string()))?;
        rx.await
            .map_err(|_| ClientError::Transport("reply dropped".to_string()))?
    }
}

struct Harness {
    controller: FetchDispatchController,
    store: Arc<StateContainer>,
    calls: mpsc::UnboundedReceiver<PendingCall>,
    events: broadcast::Receiver<Event>,
}

fn harness() -> Harness {
    let (tx, calls) = mpsc::unbounded_channel();
    let store = Arc::new(StateContainer::new());
    let events = store.events();
    let controller = FetchDispatchController::new(
        Arc::new(ScriptedFetcher { calls: tx }),
        Arc::clone(&store),
        &ClientConfig::default(),
    );
    Harness {
        controller,
        store,
        calls,
        events,
    }
}

impl Harness {
    async fn next_call(&mut self) -> PendingCall {
        self.calls.recv().await.expect("controller made no request")
    }

    fn drain_events(&mut self) -> Vec<Event> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }
}

fn raw_action(name: &str, path: &str, method: &str, function: &str) -> Value {
    json!({
        "allowedServices": [],
        "allowedRoles": [],
        "applicationInterceptors": [],
        "dispatchMechanism": method,
        "function": function,
        "functionAnnotations": [],
        "name": name,
        "networkInterceptors": [],
        "parameterTypes": [],
        "pathPattern": path,
        "requestMediaTypes": ["application/json"],
        "responseMediaType": "application/json",
        "returnType": "kotlin.String"
    })
}

fn metadata_body(actions: Vec<Value>) -> Value {
    json!({ "webActionMetadata": actions })
}

fn metadata_names(snapshot: &Snapshot) -> Vec<String> {
    snapshot
        .metadata
        .as_ref()
        .map(|m| m.iter().map(|a| a.name.clone()).collect())
        .unwrap_or_default()
}

// ═══════════════════════════════════════════════════════
// SUCCESS PATHS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_metadata_success_aggregates_routes() {
    let mut h = harness();

    let handle = h.controller.trigger(Operation::Metadata).await;
    assert!(h.store.snapshot().loading);

    let call = h.next_call().await;
    assert_eq!(call.path, "/api/webaction/metadata");
    let body = metadata_body(vec![
        raw_action("A", "/a", "GET", "fun getA()"),
        raw_action("A", "/a", "POST", "fun postA()"),
    ]);
    call.respond(body);
    handle.await.unwrap();

    let snapshot = h.store.snapshot();
    assert!(!snapshot.loading);
    assert!(snapshot.success);
    assert!(snapshot.error.is_none());

    let metadata = snapshot.metadata.expect("metadata published");
    assert_eq!(metadata.len(), 1);
    assert_eq!(metadata[0].path_pattern, "/a");
    assert_eq!(
        metadata[0].dispatch_mechanism,
        vec![HttpMethod::Post, HttpMethod::Get]
    );
    assert_eq!(metadata[0].allowed_roles, "None");
    assert_eq!(metadata[0].function, "getA()");
}

#[tokio::test]
async fn test_actions_pass_through_untouched() {
    let mut h = harness();

    let handle = h.controller.trigger(Operation::Actions).await;
    let call = h.next_call().await;
    assert_eq!(call.path, "/api/webactions");
    let body = json!([{ "name": "A", "anything": [1, 2] }, "opaque"]);
    call.respond(body.clone());
    handle.await.unwrap();

    let snapshot = h.store.snapshot();
    assert!(snapshot.success);
    assert_eq!(Value::Array(snapshot.data.unwrap()), body);
    assert!(snapshot.metadata.is_none());
}

#[tokio::test]
async fn test_event_sequence_for_one_run() {
    let mut h = harness();

    let handle = h.controller.trigger(Operation::Actions).await;
    h.next_call().await.respond(json!([]));
    handle.await.unwrap();

    let events = h.drain_events();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0], Event::requested(Operation::Actions));
    assert_eq!(events[1], Event::loading(Operation::Actions));
    let Event::Success { operation, payload } = &events[2] else {
        panic!("expected a success event, got {:?}", events[2]);
    };
    assert_eq!(*operation, Operation::Actions);
    assert!(payload.success && !payload.loading);
}

// ═══════════════════════════════════════════════════════
// CANCELLATION
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_newer_trigger_supersedes_older_run() {
    let mut h = harness();

    let first = h.controller.trigger(Operation::Metadata).await;
    let first_call = h.next_call().await;

    let second = h.controller.trigger(Operation::Metadata).await;
    let second_call = h.next_call().await;

    // The first request resolves only after the second trigger.
    let old = raw_action("Old", "/old", "GET", "fun old()");
    let new = raw_action("New", "/new", "GET", "fun new()");
    first_call.respond(metadata_body(vec![old]));
    second_call.respond(metadata_body(vec![new]));

    second.await.unwrap();
    let first_result = first.await;
    assert!(first_result.is_err_and(|e| e.is_cancelled()));

    assert_eq!(metadata_names(&h.store.snapshot()), vec!["New"]);

    let successes: Vec<Event> = h
        .drain_events()
        .into_iter()
        .filter(|e| e.is_terminal())
        .collect();
    assert_eq!(successes.len(), 1);
    assert_eq!(h.controller.generation(Operation::Metadata).await, 2);
}

#[tokio::test]
async fn test_superseded_failure_is_not_published() {
    let mut h = harness();

    let first = h.controller.trigger(Operation::Actions).await;
    let first_call = h.next_call().await;
    let second = h.controller.trigger(Operation::Actions).await;
    let second_call = h.next_call().await;

    first_call.fail(ClientError::Transport("connection reset".to_string()));
    second_call.respond(json!(["ok"]));

    second.await.unwrap();
    let _ = first.await;

    let snapshot = h.store.snapshot();
    assert!(snapshot.success);
    assert!(snapshot.error.is_none());
    assert!(!h
        .drain_events()
        .iter()
        .any(|e| matches!(e, Event::Failure { .. })));
}

#[tokio::test]
async fn test_operations_run_independently() {
    let mut h = harness();

    let metadata = h.controller.trigger(Operation::Metadata).await;
    let metadata_call = h.next_call().await;
    let actions = h.controller.trigger(Operation::Actions).await;
    let actions_call = h.next_call().await;

    actions_call.respond(json!([{ "name": "A" }]));
    actions.await.unwrap();
    let action = raw_action("M", "/m", "PUT", "fun m()");
    metadata_call.respond(metadata_body(vec![action]));
    metadata.await.unwrap();

    let snapshot = h.store.snapshot();
    assert_eq!(snapshot.data.as_ref().map(Vec::len), Some(1));
    assert_eq!(metadata_names(&snapshot), vec!["M"]);
    assert_eq!(h.controller.generation(Operation::Actions).await, 1);
    assert_eq!(h.controller.generation(Operation::Metadata).await, 1);
}

// ═══════════════════════════════════════════════════════
// FAILURES
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_rejected_call_publishes_flat_failure() {
    let mut h = harness();

    let handle = h.controller.trigger(Operation::Metadata).await;
    let call = h.next_call().await;
    call.fail(ClientError::Status {
        status: 500,
        url: "http://127.0.0.1:8080/api/webaction/metadata".to_string(),
    });
    handle.await.unwrap();

    let failure = h
        .drain_events()
        .into_iter()
        .find(|e| matches!(e, Event::Failure { .. }))
        .expect("failure published");
    let Event::Failure { payload, .. } = failure else {
        unreachable!()
    };

    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(value["loading"], false);
    assert_eq!(value["success"], false);
    assert_eq!(value["kind"], "http_status");
    assert_eq!(value["details"]["status"], 500);
    assert!(value["message"].as_str().unwrap().contains("500"));
    assert!(value.get("error").is_none());

    let snapshot = h.store.snapshot();
    assert!(!snapshot.loading);
    assert!(!snapshot.success);
    assert_eq!(snapshot.error.map(|e| e.kind), Some(ErrorKind::HttpStatus));
}

#[tokio::test]
async fn test_missing_field_fails_as_malformed_input() {
    let mut h = harness();

    let mut broken = raw_action("A", "/a", "GET", "fun getA()");
    broken.as_object_mut().unwrap().remove("returnType");

    let handle = h.controller.trigger(Operation::Metadata).await;
    h.next_call().await.respond(metadata_body(vec![broken]));
    handle.await.unwrap();

    let snapshot = h.store.snapshot();
    assert!(!snapshot.success);
    let error = snapshot.error.expect("error recorded");
    assert_eq!(error.kind, ErrorKind::MalformedInput);
    assert!(error.message.contains("returnType"));
    assert!(snapshot.metadata.is_none());
}

#[tokio::test]
async fn test_unknown_verb_fails_whole_fetch_as_malformed_input() {
    let mut h = harness();

    let handle = h.controller.trigger(Operation::Metadata).await;
    let body = metadata_body(vec![
        raw_action("Status", "/status", "GET", "fun status()"),
        raw_action("Stream", "/stream", "GRPC", "fun stream()"),
    ]);
    h.next_call().await.respond(body);
    handle.await.unwrap();

    let snapshot = h.store.snapshot();
    assert!(!snapshot.success);
    assert!(snapshot.metadata.is_none());
    let error = snapshot.error.expect("error recorded");
    assert_eq!(error.kind, ErrorKind::MalformedInput);
    assert!(error.message.contains("GRPC"));
}

#[tokio::test]
async fn test_failure_keeps_earlier_metadata() {
    let mut h = harness();

    let handle = h.controller.trigger(Operation::Metadata).await;
    let action = raw_action("A", "/a", "GET", "fun a()");
    h.next_call().await.respond(metadata_body(vec![action]));
    handle.await.unwrap();

    let handle = h.controller.trigger(Operation::Metadata).await;
    let timeout = ClientError::Transport("timed out".to_string());
    h.next_call().await.fail(timeout);
    handle.await.unwrap();

    let snapshot = h.store.snapshot();
    assert!(!snapshot.success);
    assert_eq!(metadata_names(&snapshot), vec!["A"]);
}

// ═══════════════════════════════════════════════════════
// DISPATCH
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_dispatch_routes_triggers_and_forwards_others() {
    let mut h = harness();

    let loading = Event::loading(Operation::Actions);
    let forwarded = h.controller.dispatch(loading).await;
    assert!(forwarded.is_none());
    assert!(h.store.snapshot().loading);

    let handle = h
        .controller
        .dispatch(Event::requested(Operation::Actions))
        .await
        .expect("trigger starts a run");
    h.next_call().await.respond(json!([]));
    handle.await.unwrap();

    assert!(h.store.snapshot().success);
    assert_eq!(h.controller.generation(Operation::Actions).await, 1);
}
