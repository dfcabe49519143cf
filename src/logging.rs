//! Structured logging for the handler layer.
//!
//! Event helpers keep field names consistent (`event = "..."`) so log
//! pipelines can filter on registry, resolution and dispatch activity.

use {
    crate::config::LogFormat,
    std::time::Duration,
    tracing::{debug, error, info, span, trace, warn, Level, Span},
    tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter},
    uuid::Uuid,
};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` controls filtering (default `mcp_protocol=info`). Fails if a
/// global subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mcp_protocol=info"));

    match format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Text => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    info!(format = ?format, "Tracing initialized");
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Span covering one handler instance (one session)
pub fn session_span(session_id: &SessionId) -> Span {
    span!(Level::INFO, "mcp_session", session_id = %session_id)
}

/// Create a span for tracking a request
pub fn request_span(method: &str, request_id: Option<&str>, session_id: Option<&str>) -> Span {
    span!(
        Level::INFO,
        "mcp_request",
        method = %method,
        request_id = request_id,
        session_id = session_id,
    )
}

/// Registry events
pub fn log_registered(kind: &str, key: &str) {
    debug!(
        kind = %kind,
        key = %key,
        event = "registered",
        "Registered handler"
    );
}

pub fn log_registration_overwritten(kind: &str, key: &str) {
    warn!(
        kind = %kind,
        key = %key,
        event = "registration_overwritten",
        "Registration replaced an existing handler"
    );
}

pub fn log_malformed_template(template: &str, reason: &str) {
    warn!(
        template = %template,
        reason = %reason,
        event = "malformed_template",
        "Resource template is malformed and will never match"
    );
}

/// Resolution events
pub fn log_resource_resolved(uri: &str, matched_by: &str, key: &str) {
    trace!(
        uri = %uri,
        matched_by = %matched_by,
        key = %key,
        event = "resource_resolved",
        "Resolved resource handler"
    );
}

pub fn log_resource_not_found(uri: &str) {
    debug!(
        uri = %uri,
        event = "resource_not_found",
        "No resource or template matched"
    );
}

/// Capability events
pub fn log_capability_unsupported(feature: &str, detail: Option<&str>) {
    info!(
        feature = %feature,
        detail = detail,
        event = "capability_unsupported",
        "Peer does not support requested capability"
    );
}

pub fn log_client_initialized(client_name: &str, client_version: &str, protocol_version: &str) {
    info!(
        client_name = %client_name,
        client_version = %client_version,
        protocol_version = %protocol_version,
        event = "client_initialized",
        "Client initialized session"
    );
}

/// Dispatch events
pub fn log_handler_start(method: &str) {
    debug!(
        method = %method,
        event = "handler_start",
        "Starting to handle method"
    );
}

pub fn log_handler_success(method: &str, duration: Duration) {
    debug!(
        method = %method,
        duration_ms = duration.as_millis(),
        event = "handler_success",
        "Successfully handled method"
    );
}

pub fn log_handler_error(method: &str, error: &str, duration: Duration) {
    error!(
        method = %method,
        error = %error,
        duration_ms = duration.as_millis(),
        event = "handler_error",
        "Failed to handle method"
    );
}

pub fn log_duplicate_request_id(request_id: &str) {
    warn!(
        request_id = %request_id,
        event = "duplicate_request_id",
        "Request id already in flight; new request is not cancellable"
    );
}

pub fn log_unknown_method(method: &str) {
    warn!(
        method = %method,
        event = "unknown_method",
        "Unknown MCP method requested"
    );
}

pub fn log_notification_received(method: &str) {
    debug!(
        method = %method,
        event = "notification_received",
        "Received notification"
    );
}
