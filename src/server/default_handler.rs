//! Default handler composing the registry and capability negotiator.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, Instrument, Span};

use crate::{
    client,
    config::HandlerConfig,
    error::{McpError, McpResult},
    logging,
    schema::{
        CallToolParams, CallToolResult, CreateMessageRequest, CreateMessageResult, ElicitRequest,
        ElicitResult, ElicitationCapability, GetPromptParams, GetPromptResult, Implementation,
        InitializeParams, InitializeResult, ListChangedCapability, LoggingLevel, Notification,
        ReadResourceParams, ReadResourceResult, ResourcesCapability, SamplingCapability,
        ServerCapabilities, METHOD_INITIALIZE, METHOD_PING, METHOD_PROMPTS_LIST,
        METHOD_RESOURCES_LIST, METHOD_RESOURCES_TEMPLATES_LIST, METHOD_TOOLS_LIST,
        NOTIFICATION_CANCELLED, NOTIFICATION_INITIALIZED, NOTIFICATION_MESSAGE,
        NOTIFICATION_PROGRESS, NOTIFICATION_PROMPTS_LIST_CHANGED,
        NOTIFICATION_RESOURCES_LIST_CHANGED, NOTIFICATION_RESOURCES_UPDATED,
        NOTIFICATION_ROOTS_LIST_CHANGED, NOTIFICATION_TOOLS_LIST_CHANGED,
    },
};

use super::{
    capabilities::Negotiator,
    context::RequestContext,
    handler::{Handler, HandlerDeps, Operations},
    notifier::Notifier,
    registry::Registry,
};

/// Base implementation of [`Handler`].
///
/// Serves `initialize`, `ping` and every resource/tool/prompt method backed
/// by its [`Registry`], records the client's capabilities, and gates
/// sampling/elicitation calls back into the client.
///
/// # Examples
/// ```rust
/// use mcp_protocol::client::UnsupportedClient;
/// use mcp_protocol::schema::{ReadResourceResult, Resource, ResourceContents};
/// use mcp_protocol::server::{DefaultHandler, Handler, HandlerDeps, NoopNotifier};
/// use std::sync::Arc;
///
/// let deps = HandlerDeps::new(Arc::new(NoopNotifier), Arc::new(UnsupportedClient));
/// let base = DefaultHandler::new(deps);
/// base.registry()
///     .register_resource(Resource::new("res://motd", "motd"), |_ctx, params| async move {
///         Ok(ReadResourceResult {
///             contents: vec![ResourceContents::text(params.uri, None, "hello")],
///         })
///     });
/// assert!(base.implements("resources/read"));
/// ```
pub struct DefaultHandler {
    registry: Registry,
    negotiator: Negotiator,
    notifier: Arc<dyn Notifier>,
    client: Arc<dyn client::Operations>,
    config: Arc<HandlerConfig>,
    span: Span,
}

impl DefaultHandler {
    pub fn new(deps: HandlerDeps) -> Self {
        let registry =
            Registry::new().with_overwrite_warnings(deps.config.warn_on_duplicate_registration);
        Self {
            registry,
            negotiator: Negotiator::new(),
            notifier: deps.notifier,
            client: deps.client,
            config: deps.config,
            span: deps.span,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn negotiator(&self) -> &Negotiator {
        &self.negotiator
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn client(&self) -> &Arc<dyn client::Operations> {
        &self.client
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    // ----- capability queries -----

    pub fn client_initialize(&self) -> Option<Arc<InitializeParams>> {
        self.negotiator.client_initialize()
    }

    pub fn sampling_capability(&self) -> Option<SamplingCapability> {
        let _enter = self.span.enter();
        self.negotiator.sampling_capability()
    }

    pub fn elicitation_capability(&self) -> Option<ElicitationCapability> {
        let _enter = self.span.enter();
        self.negotiator.elicitation_capability()
    }

    pub fn can_sample(&self) -> bool {
        self.sampling_capability().is_some_and(|cap| cap.enabled)
    }

    pub fn can_elicit(&self) -> bool {
        self.elicitation_capability().is_some_and(|cap| cap.enabled)
    }

    pub fn supports_elicitation_mode(&self, mode: &str) -> bool {
        self.elicitation_capability()
            .is_some_and(|cap| cap.supports_mode(mode))
    }

    // ----- calls back into the client -----

    /// Ask the client for an LLM completion.
    ///
    /// Fails with `SamplingNotSupported` before contacting the client when it
    /// did not enable sampling, or when `request.tools` is non-empty and the
    /// client cannot sample with tools.
    pub async fn create_message(
        &self,
        ctx: &RequestContext,
        request: CreateMessageRequest,
    ) -> McpResult<CreateMessageResult> {
        {
            let _enter = self.span.enter();
            self.negotiator.require_sampling(!request.tools.is_empty())?;
        }
        self.client
            .create_message(ctx, request)
            .instrument(self.span.clone())
            .await
    }

    /// Ask the client to collect input from its user.
    ///
    /// Fails with `ElicitationNotSupported` unless the client enabled
    /// elicitation and listed `request.mode` as supported.
    pub async fn elicit(
        &self,
        ctx: &RequestContext,
        request: ElicitRequest,
    ) -> McpResult<ElicitResult> {
        {
            let _enter = self.span.enter();
            self.negotiator.require_elicitation(&request.mode)?;
        }
        self.client
            .elicit(ctx, request)
            .instrument(self.span.clone())
            .await
    }

    // ----- notifications to the client -----

    pub async fn notify(&self, method: &str, params: Option<Value>) -> McpResult<()> {
        self.notifier
            .notify(Notification::new(method, params))
            .instrument(self.span.clone())
            .await
    }

    pub async fn notify_resources_list_changed(&self) -> McpResult<()> {
        self.notify(NOTIFICATION_RESOURCES_LIST_CHANGED, None).await
    }

    pub async fn notify_resource_updated(&self, uri: &str) -> McpResult<()> {
        self.notify(NOTIFICATION_RESOURCES_UPDATED, Some(json!({ "uri": uri })))
            .await
    }

    pub async fn notify_tools_list_changed(&self) -> McpResult<()> {
        self.notify(NOTIFICATION_TOOLS_LIST_CHANGED, None).await
    }

    pub async fn notify_prompts_list_changed(&self) -> McpResult<()> {
        self.notify(NOTIFICATION_PROMPTS_LIST_CHANGED, None).await
    }

    /// Send a `notifications/message` log entry to the client.
    pub async fn send_log_message(
        &self,
        level: LoggingLevel,
        logger: Option<&str>,
        data: Value,
    ) -> McpResult<()> {
        let mut params = json!({ "level": level, "data": data });
        if let Some(logger) = logger {
            params["logger"] = json!(logger);
        }
        self.notify(NOTIFICATION_MESSAGE, Some(params)).await
    }

    pub async fn send_progress(
        &self,
        progress_token: &str,
        progress: f64,
        total: Option<f64>,
    ) -> McpResult<()> {
        let mut params = json!({ "progressToken": progress_token, "progress": progress });
        if let Some(total) = total {
            params["total"] = json!(total);
        }
        self.notify(NOTIFICATION_PROGRESS, Some(params)).await
    }

    // ----- behavior behind the default Operations bodies -----

    /// Record the client's initialize params and build the response.
    pub fn accept_initialize(&self, params: InitializeParams) -> InitializeResult {
        let _enter = self.span.enter();
        if self.negotiator.is_initialized() {
            info!("Client re-initialized; replacing recorded capabilities");
        }

        let protocol_version = self
            .config
            .negotiate_protocol_version(&params.protocol_version);
        logging::log_client_initialized(
            &params.client_info.name,
            &params.client_info.version,
            &protocol_version,
        );
        self.negotiator.record_initialize(params);

        InitializeResult {
            protocol_version,
            capabilities: self.server_capabilities(),
            server_info: Implementation::new(
                self.config.server_name.clone(),
                self.config.server_version.clone(),
            ),
            instructions: self.config.instructions.clone(),
        }
    }

    /// Capabilities implied by what has been registered so far.
    pub fn server_capabilities(&self) -> ServerCapabilities {
        let has_resources = self.registry.implements(METHOD_RESOURCES_LIST)
            || self.registry.implements(METHOD_RESOURCES_TEMPLATES_LIST);
        ServerCapabilities {
            experimental: None,
            logging: Some(json!({})),
            prompts: self
                .registry
                .implements(METHOD_PROMPTS_LIST)
                .then(|| ListChangedCapability { list_changed: true }),
            resources: has_resources.then(|| ResourcesCapability {
                subscribe: false,
                list_changed: true,
            }),
            tools: self
                .registry
                .implements(METHOD_TOOLS_LIST)
                .then(|| ListChangedCapability { list_changed: true }),
        }
    }

    /// `initialize` and `ping` always; everything else once registered.
    pub fn supports(&self, method: &str) -> bool {
        method == METHOD_INITIALIZE || method == METHOD_PING || self.registry.implements(method)
    }

    pub async fn read_registered_resource(
        &self,
        ctx: &RequestContext,
        params: ReadResourceParams,
    ) -> McpResult<ReadResourceResult> {
        let handler = {
            let _enter = self.span.enter();
            self.registry.resource_handler(&params.uri)
        };
        match handler {
            Some(handler) => handler(ctx.clone(), params).await,
            None => Err(McpError::UnknownResource(params.uri)),
        }
    }

    pub async fn call_registered_tool(
        &self,
        ctx: &RequestContext,
        params: CallToolParams,
    ) -> McpResult<CallToolResult> {
        match self.registry.tool_handler(&params.name) {
            Some(handler) => handler(ctx.clone(), params.arguments).await,
            None => Err(McpError::UnknownTool(params.name)),
        }
    }

    pub async fn get_registered_prompt(
        &self,
        ctx: &RequestContext,
        params: GetPromptParams,
    ) -> McpResult<GetPromptResult> {
        match self.registry.prompt_handler(&params.name) {
            Some(handler) => handler(ctx.clone(), params).await,
            None => Err(McpError::UnknownPrompt(params.name)),
        }
    }

    pub fn handle_notification(&self, _ctx: &RequestContext, notification: Notification) {
        let _enter = self.span.enter();
        match notification.method.as_str() {
            NOTIFICATION_INITIALIZED => info!("Client reported initialization complete"),
            NOTIFICATION_CANCELLED => debug!(
                params = ?notification.params,
                "Client cancelled a request"
            ),
            NOTIFICATION_ROOTS_LIST_CHANGED => debug!("Client roots changed"),
            other => logging::log_notification_received(other),
        }
    }
}

#[async_trait]
impl Operations for DefaultHandler {
    fn base(&self) -> Option<&DefaultHandler> {
        Some(self)
    }
}

#[async_trait]
impl Handler for DefaultHandler {}
