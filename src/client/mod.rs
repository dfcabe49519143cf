//! Client-side contract.
//!
//! [`Operations`] is what a server calls when it needs something from the
//! peer (an LLM completion, user input, the workspace roots). The same trait
//! is what a process acting as the client implements.

use async_trait::async_trait;

use crate::{
    error::{McpError, McpResult},
    schema::{
        CreateMessageRequest, CreateMessageResult, ElicitRequest, ElicitResult, ListRootsResult,
        Notification, METHOD_ELICITATION_CREATE, METHOD_ROOTS_LIST,
        METHOD_SAMPLING_CREATE_MESSAGE,
    },
    server::RequestContext,
};

/// Operations served by the client side of a session.
///
/// Every method defaults to `UnknownMethod`, so implementers only override
/// what they support.
#[async_trait]
pub trait Operations: Send + Sync {
    /// `sampling/createMessage`
    async fn create_message(
        &self,
        _ctx: &RequestContext,
        _request: CreateMessageRequest,
    ) -> McpResult<CreateMessageResult> {
        Err(McpError::UnknownMethod(METHOD_SAMPLING_CREATE_MESSAGE.to_string()))
    }

    /// `elicitation/create`
    async fn elicit(
        &self,
        _ctx: &RequestContext,
        _request: ElicitRequest,
    ) -> McpResult<ElicitResult> {
        Err(McpError::UnknownMethod(METHOD_ELICITATION_CREATE.to_string()))
    }

    /// `roots/list`
    async fn list_roots(&self, _ctx: &RequestContext) -> McpResult<ListRootsResult> {
        Err(McpError::UnknownMethod(METHOD_ROOTS_LIST.to_string()))
    }

    async fn ping(&self, _ctx: &RequestContext) -> McpResult<()> {
        Ok(())
    }
}

/// Client implementer: operations plus server-pushed notifications.
#[async_trait]
pub trait Handler: Operations {
    async fn on_notification(&self, ctx: &RequestContext, notification: Notification);
}

/// A peer that supports none of the optional client operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedClient;

#[async_trait]
impl Operations for UnsupportedClient {}

#[async_trait]
impl Handler for UnsupportedClient {
    async fn on_notification(&self, _ctx: &RequestContext, notification: Notification) {
        crate::logging::log_notification_received(&notification.method);
    }
}
