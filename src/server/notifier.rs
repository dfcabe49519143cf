//! Outbound notification boundary.
//!
//! The transport owns delivery; handlers only see the [`Notifier`] trait.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{
    error::{McpError, McpResult},
    schema::Notification,
};

/// Pushes protocol notifications to the remote peer.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification) -> McpResult<()>;
}

/// Notifier backed by an unbounded tokio channel; the transport drains the receiver.
#[derive(Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn from_sender(sender: mpsc::UnboundedSender<Notification>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, notification: Notification) -> McpResult<()> {
        self.sender
            .send(notification)
            .map_err(|e| McpError::Notification(format!("channel closed: {}", e.0.method)))
    }
}

/// Drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _notification: Notification) -> McpResult<()> {
        Ok(())
    }
}
