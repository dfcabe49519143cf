//! Server Handler Contract
//!
//! [`Operations`] and [`Handler`] are the surface the dispatcher talks to.
//! Concrete implementers usually embed a [`DefaultHandler`] and return it
//! from [`Operations::base`]; every method they don't override then falls
//! through to the shared registry and negotiator.

use async_trait::async_trait;
use futures_util::{future::BoxFuture, FutureExt};
use std::{future::Future, sync::Arc};
use tracing::Span;

use crate::{
    client,
    config::HandlerConfig,
    error::{McpError, McpResult},
    logging::{self, SessionId},
    schema::{
        CallToolParams, CallToolResult, GetPromptParams, GetPromptResult, InitializeParams,
        InitializeResult, ListPromptsResult, ListResourceTemplatesResult, ListResourcesResult,
        ListToolsResult, Notification, PaginatedParams, ReadResourceParams, ReadResourceResult,
        METHOD_INITIALIZE, METHOD_PROMPTS_GET, METHOD_PROMPTS_LIST, METHOD_RESOURCES_LIST,
        METHOD_RESOURCES_READ, METHOD_RESOURCES_TEMPLATES_LIST, METHOD_TOOLS_CALL,
        METHOD_TOOLS_LIST,
    },
};

use super::{context::RequestContext, default_handler::DefaultHandler, notifier::Notifier};

fn unsupported(method: &str) -> McpError {
    McpError::UnknownMethod(method.to_string())
}

/// Protocol operations a server implementer may serve.
///
/// Default bodies delegate to [`Operations::base`] when it returns a
/// `DefaultHandler`, and fail with `UnknownMethod` otherwise.
#[async_trait]
pub trait Operations: Send + Sync {
    /// Shared base the default method bodies delegate to.
    fn base(&self) -> Option<&DefaultHandler> {
        None
    }

    async fn initialize(
        &self,
        _ctx: &RequestContext,
        params: InitializeParams,
    ) -> McpResult<InitializeResult> {
        let base = self.base().ok_or_else(|| unsupported(METHOD_INITIALIZE))?;
        Ok(base.accept_initialize(params))
    }

    async fn ping(&self, _ctx: &RequestContext) -> McpResult<()> {
        Ok(())
    }

    async fn list_resources(
        &self,
        _ctx: &RequestContext,
        _params: PaginatedParams,
    ) -> McpResult<ListResourcesResult> {
        let base = self.base().ok_or_else(|| unsupported(METHOD_RESOURCES_LIST))?;
        Ok(ListResourcesResult {
            resources: base.registry().list_registered_resources(),
            next_cursor: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _ctx: &RequestContext,
        _params: PaginatedParams,
    ) -> McpResult<ListResourceTemplatesResult> {
        let base = self
            .base()
            .ok_or_else(|| unsupported(METHOD_RESOURCES_TEMPLATES_LIST))?;
        Ok(ListResourceTemplatesResult {
            resource_templates: base.registry().list_registered_resource_templates(),
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        ctx: &RequestContext,
        params: ReadResourceParams,
    ) -> McpResult<ReadResourceResult> {
        let base = self.base().ok_or_else(|| unsupported(METHOD_RESOURCES_READ))?;
        base.read_registered_resource(ctx, params).await
    }

    async fn list_tools(
        &self,
        _ctx: &RequestContext,
        _params: PaginatedParams,
    ) -> McpResult<ListToolsResult> {
        let base = self.base().ok_or_else(|| unsupported(METHOD_TOOLS_LIST))?;
        Ok(ListToolsResult {
            tools: base.registry().list_registered_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        ctx: &RequestContext,
        params: CallToolParams,
    ) -> McpResult<CallToolResult> {
        let base = self.base().ok_or_else(|| unsupported(METHOD_TOOLS_CALL))?;
        base.call_registered_tool(ctx, params).await
    }

    async fn list_prompts(
        &self,
        _ctx: &RequestContext,
        _params: PaginatedParams,
    ) -> McpResult<ListPromptsResult> {
        let base = self.base().ok_or_else(|| unsupported(METHOD_PROMPTS_LIST))?;
        Ok(ListPromptsResult {
            prompts: base.registry().list_registered_prompts(),
            next_cursor: None,
        })
    }

    async fn get_prompt(
        &self,
        ctx: &RequestContext,
        params: GetPromptParams,
    ) -> McpResult<GetPromptResult> {
        let base = self.base().ok_or_else(|| unsupported(METHOD_PROMPTS_GET))?;
        base.get_registered_prompt(ctx, params).await
    }
}

/// A protocol implementer as seen by the dispatcher.
#[async_trait]
pub trait Handler: Operations {
    /// Called by the transport for every notification pushed by the client.
    async fn on_notification(&self, ctx: &RequestContext, notification: Notification) {
        match self.base() {
            Some(base) => base.handle_notification(ctx, notification),
            None => logging::log_notification_received(&notification.method),
        }
    }

    /// Whether requests for `method` should be routed to this handler.
    fn implements(&self, method: &str) -> bool {
        self.base().is_some_and(|base| base.supports(method))
    }
}

/// Dependencies injected into every handler at construction time.
#[derive(Clone)]
pub struct HandlerDeps {
    pub notifier: Arc<dyn Notifier>,
    /// Span all of the handler's diagnostics are recorded under
    pub span: Span,
    pub client: Arc<dyn client::Operations>,
    pub config: Arc<HandlerConfig>,
}

impl HandlerDeps {
    pub fn new(notifier: Arc<dyn Notifier>, client: Arc<dyn client::Operations>) -> Self {
        Self {
            notifier,
            span: logging::session_span(&SessionId::new()),
            client,
            config: Arc::new(HandlerConfig::default()),
        }
    }

    pub fn with_config(mut self, config: HandlerConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// Factory the transport calls once per session.
pub type NewHandler =
    Arc<dyn Fn(HandlerDeps) -> BoxFuture<'static, McpResult<Arc<dyn Handler>>> + Send + Sync>;

/// Wrap an async constructor as a [`NewHandler`].
pub fn new_handler<F, Fut>(factory: F) -> NewHandler
where
    F: Fn(HandlerDeps) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = McpResult<Arc<dyn Handler>>> + Send + 'static,
{
    Arc::new(move |deps| factory(deps).boxed())
}
