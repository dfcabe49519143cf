//! Minimal custom server
//!
//! Embeds `DefaultHandler`, overrides `resources/list` and feeds a few
//! decoded requests through a `Dispatcher` the way a transport would.
//!
//! Run with: `cargo run --example myimpl`

use async_trait::async_trait;
use mcp_protocol::{
    client::UnsupportedClient,
    logging::init_tracing,
    schema::{
        ListResourcesResult, PaginatedParams, ReadResourceResult, Resource, ResourceContents,
        ResourceTemplate, METHOD_RESOURCES_LIST,
    },
    server::{ChannelNotifier, RequestContext, UriTemplate},
    DefaultHandler, Dispatcher, Handler, HandlerConfig, HandlerDeps, McpResult, Operations,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

const PROVIDER_TEMPLATE: &str = "amp://providers/{provider}";

struct MyMcpServer {
    base: DefaultHandler,
}

impl MyMcpServer {
    fn new(deps: HandlerDeps) -> Self {
        let base = DefaultHandler::new(deps);
        let providers = Arc::new(UriTemplate::parse(PROVIDER_TEMPLATE));
        base.registry().register_resource_template(
            ResourceTemplate::new(PROVIDER_TEMPLATE, "provider").with_mime_type("application/json"),
            move |_ctx, params| {
                let provider = providers
                    .captures(&params.uri)
                    .and_then(|mut vars| vars.remove("provider"))
                    .unwrap_or_default();
                async move {
                    let body = json!({ "provider": provider, "status": "available" }).to_string();
                    Ok(ReadResourceResult {
                        contents: vec![ResourceContents::text(
                            params.uri,
                            Some("application/json".to_string()),
                            body,
                        )],
                    })
                }
            },
        );
        // Template-only registries do not advertise resources/read
        base.registry().register_resource(
            Resource::new("amp://providers/default", "default provider"),
            |_ctx, params| async move {
                Ok(ReadResourceResult {
                    contents: vec![ResourceContents::text(params.uri, None, "openai")],
                })
            },
        );
        Self { base }
    }
}

#[async_trait]
impl Operations for MyMcpServer {
    fn base(&self) -> Option<&DefaultHandler> {
        Some(&self.base)
    }

    async fn list_resources(
        &self,
        _ctx: &RequestContext,
        _params: PaginatedParams,
    ) -> McpResult<ListResourcesResult> {
        let resources = ["openai", "anthropic"]
            .into_iter()
            .map(|p| Resource::new(format!("amp://providers/{p}"), p))
            .collect();
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
        })
    }
}

#[async_trait]
impl Handler for MyMcpServer {
    fn implements(&self, method: &str) -> bool {
        method == METHOD_RESOURCES_LIST || self.base.supports(method)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = HandlerConfig::from_env();
    init_tracing(config.log_format)?;

    let (notifier, mut notifications) = ChannelNotifier::new();
    let deps =
        HandlerDeps::new(Arc::new(notifier), Arc::new(UnsupportedClient)).with_config(config);
    let server = Arc::new(MyMcpServer::new(deps));
    let dispatcher = Dispatcher::new(server.clone());

    let ctx = RequestContext::new().with_session_id("demo");
    let init = dispatcher
        .dispatch(
            ctx.clone().with_request_id("1"),
            "initialize",
            Some(json!({
                "protocolVersion": "2025-06-18",
                "capabilities": {"sampling": {"enabled": true}},
                "clientInfo": {"name": "demo-client", "version": "0.1.0"}
            })),
        )
        .await?;
    info!(result = %init, "initialize");

    let listed = dispatcher
        .dispatch(ctx.clone().with_request_id("2"), "resources/list", None)
        .await?;
    info!(result = %listed, "resources/list");

    let read = dispatcher
        .dispatch(
            ctx.clone().with_request_id("3"),
            "resources/read",
            Some(json!({ "uri": "amp://providers/openai" })),
        )
        .await?;
    info!(result = %read, "resources/read");

    server.base.notify_resources_list_changed().await?;
    if let Some(notification) = notifications.recv().await {
        info!(method = %notification.method, "notification queued for transport");
    }

    info!(can_sample = server.base.can_sample(), "client capabilities");
    Ok(())
}
