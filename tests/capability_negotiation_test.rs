//! Capability Negotiation Integration Tests
//!
//! Initialize through the dispatcher, then exercise the base handler's
//! sampling and elicitation gates against a scripted client.


use async_trait::async_trait;
use mcp_protocol::{
    client,
    schema::{
        CreateMessageRequest, CreateMessageResult, ElicitAction, ElicitRequest, ElicitResult,
        Message, Role,
    },
    server::RequestContext,
    DefaultHandler, Dispatcher, McpError, McpResult, Operations,
};
use mcp_test_helpers::{init_test_tracing, initialize, test_deps_with_client};
use serde_json::{json, Map, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tokio_test::{assert_err, assert_ok};

#[derive(Default)]
struct ScriptedClient {
    sampled: AtomicUsize,
    elicited: AtomicUsize,
}

#[async_trait]
impl client::Operations for ScriptedClient {
    async fn create_message(
        &self,
        _ctx: &RequestContext,
        _request: CreateMessageRequest,
    ) -> McpResult<CreateMessageResult> {
        self.sampled.fetch_add(1, Ordering::SeqCst);
        Ok(CreateMessageResult {
            content: "42".to_string(),
            model: "scripted".to_string(),
            stop_reason: "end_turn".to_string(),
            usage: Default::default(),
        })
    }

    async fn elicit(
        &self,
        _ctx: &RequestContext,
        _request: ElicitRequest,
    ) -> McpResult<ElicitResult> {
        self.elicited.fetch_add(1, Ordering::SeqCst);
        Ok(ElicitResult {
            action: ElicitAction::Decline,
            content: Map::new(),
        })
    }
}

fn setup() -> (Dispatcher, Arc<ScriptedClient>) {
    init_test_tracing();
    let client = Arc::new(ScriptedClient::default());
    let handler = DefaultHandler::new(test_deps_with_client(client.clone()));
    (Dispatcher::new(Arc::new(handler)), client)
}

fn base(dispatcher: &Dispatcher) -> &DefaultHandler {
    dispatcher.handler().base().expect("default handler base")
}

fn question() -> CreateMessageRequest {
    CreateMessageRequest {
        messages: vec![Message {
            role: Role::User,
            content: json!("What is six times seven?"),
        }],
        max_tokens: Some(16),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_sampling_enabled_client() {
    let (dispatcher, client) = setup();
    initialize(&dispatcher, json!({"sampling": {"enabled": true, "supportsTools": false}}))
        .await
        .expect("initialize");

    let base = base(&dispatcher);
    assert!(base.can_sample());
    let result = assert_ok!(base.create_message(&RequestContext::new(), question()).await);
    assert_eq!(result.content, "42");
    assert_eq!(client.sampled.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_client_without_sampling_is_never_contacted() {
    let (dispatcher, client) = setup();
    initialize(&dispatcher, json!({"roots": {"listChanged": true}}))
        .await
        .expect("initialize");

    let base = base(&dispatcher);
    assert!(!base.can_sample());
    assert!(base.sampling_capability().is_none());

    let err = assert_err!(base.create_message(&RequestContext::new(), question()).await);
    assert!(matches!(err, McpError::SamplingNotSupported));
    assert_eq!(client.sampled.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_elicitation_modes_from_messy_capabilities() {
    let (dispatcher, client) = setup();
    initialize(
        &dispatcher,
        json!({"elicitation": {"enabled": true, "supportedModes": ["form", 42, null, "url"]}}),
    )
    .await
    .expect("initialize");

    let base = base(&dispatcher);
    let capability = base.elicitation_capability().expect("section present");
    assert_eq!(capability.supported_modes, ["form", "url"]);

    let result = assert_ok!(
        base.elicit(&RequestContext::new(), ElicitRequest::url("Authorize", "https://example.com"))
            .await
    );
    assert_eq!(result.action, ElicitAction::Decline);
    assert_eq!(client.elicited.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_reinitialize_uses_latest_capabilities() {
    let (dispatcher, _client) = setup();

    initialize(&dispatcher, json!({"sampling": {"enabled": true}}))
        .await
        .expect("first initialize");
    assert!(base(&dispatcher).can_sample());

    initialize(&dispatcher, json!({}))
        .await
        .expect("second initialize");
    assert!(!base(&dispatcher).can_sample());
}

#[tokio::test]
async fn test_unknown_protocol_version_gets_server_version() {
    let (dispatcher, _client) = setup();
    let mut params = mcp_test_helpers::initialize_params(Value::Object(Map::new()));
    params["protocolVersion"] = json!("1999-12-31");

    let result = dispatcher
        .dispatch(RequestContext::new(), "initialize", Some(params))
        .await
        .expect("initialize");
    assert_eq!(result["protocolVersion"], "2025-06-18");
}

#[test]
fn test_queries_before_initialize() {
    let (dispatcher, client) = setup();
    let base = base(&dispatcher);

    assert!(base.client_initialize().is_none());
    assert!(!base.can_elicit());
    assert!(!base.supports_elicitation_mode("form"));

    let err = tokio_test::block_on(base.elicit(
        &RequestContext::new(),
        ElicitRequest::form("Name?", Map::new()),
    ))
    .expect_err("elicitation gated");
    assert!(err.is_capability_unsupported());
    assert_eq!(client.elicited.load(Ordering::SeqCst), 0);
}
