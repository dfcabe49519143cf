//! Unit tests for the handler toolkit.

pub mod registry_tests;
pub mod syncmap_tests;

use crate::{
    client::UnsupportedClient,
    schema::{ReadResourceResult, ResourceContents},
    server::{DefaultHandler, HandlerDeps, NoopNotifier},
};
use std::sync::Arc;

/// A default handler with no-op notifier and a client that supports nothing.
pub(crate) fn test_handler() -> DefaultHandler {
    DefaultHandler::new(HandlerDeps::new(
        Arc::new(NoopNotifier),
        Arc::new(UnsupportedClient),
    ))
}

/// A read result carrying a single text body.
pub(crate) fn text_result(uri: &str, text: &str) -> ReadResourceResult {
    ReadResourceResult {
        contents: vec![ResourceContents::text(uri, None, text)],
    }
}

/// The text of the first content entry.
pub(crate) fn first_text(result: &ReadResourceResult) -> &str {
    result.contents[0].text.as_deref().unwrap_or_default()
}
