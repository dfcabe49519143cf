//! Per-request context handed to every handler.

use tokio_util::sync::CancellationToken;

/// Context provided to handler functions and [`super::Operations`] methods.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// JSON-RPC id of the request, rendered as a string
    pub request_id: Option<String>,
    /// Session the request belongs to
    pub session_id: Option<String>,
    /// Cancelled when the peer sends `notifications/cancelled` or the transport goes away
    pub cancellation: CancellationToken,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
