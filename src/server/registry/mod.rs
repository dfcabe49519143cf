//! Registry of resources, resource templates, tools and prompts.
//!
//! One `Registry` is shared by every task serving a session. All state lives
//! in [`SyncMap`]s, so registration and dispatch may interleave freely.
//! Entries are built completely, wrapped in `Arc` and only then inserted;
//! they are never mutated afterwards.

mod prompt_registration;
mod resource_registration;
mod tool_registration;

use futures_util::future::BoxFuture;
use serde_json::Value;
use std::{fmt, sync::Arc};

use crate::{
    error::McpResult,
    logging,
    schema::{
        CallToolResult, GetPromptParams, GetPromptResult, Prompt, ReadResourceParams,
        ReadResourceResult, Resource, ResourceTemplate, Tool,
    },
    syncmap::SyncMap,
};

use super::{context::RequestContext, template::UriTemplate};

/// Handles a `resources/read` request for one resource or template family.
pub type ResourceHandlerFunc = Arc<
    dyn Fn(RequestContext, ReadResourceParams) -> BoxFuture<'static, McpResult<ReadResourceResult>>
        + Send
        + Sync,
>;

/// Handles a `tools/call` request; receives the raw `arguments` value.
pub type ToolHandlerFunc = Arc<
    dyn Fn(RequestContext, Option<Value>) -> BoxFuture<'static, McpResult<CallToolResult>>
        + Send
        + Sync,
>;

/// Handles a `prompts/get` request.
pub type PromptHandlerFunc = Arc<
    dyn Fn(RequestContext, GetPromptParams) -> BoxFuture<'static, McpResult<GetPromptResult>>
        + Send
        + Sync,
>;

/// A handler with its metadata.
#[derive(Clone)]
pub struct ResourceEntry {
    pub handler: ResourceHandlerFunc,
    pub metadata: Resource,
}

/// A template handler with its metadata and compiled matcher.
#[derive(Clone)]
pub struct ResourceTemplateEntry {
    pub handler: ResourceHandlerFunc,
    pub metadata: ResourceTemplate,
    pub template: UriTemplate,
}

#[derive(Clone)]
pub struct ToolEntry {
    pub handler: ToolHandlerFunc,
    pub metadata: Tool,
}

#[derive(Clone)]
pub struct PromptEntry {
    pub handler: PromptHandlerFunc,
    pub metadata: Prompt,
}

impl fmt::Debug for ResourceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceEntry")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for ResourceTemplateEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceTemplateEntry")
            .field("metadata", &self.metadata)
            .field("valid", &self.template.is_valid())
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for ToolEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolEntry")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for PromptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptEntry")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Method-support flags plus the handler maps consulted during dispatch.
#[derive(Debug)]
pub struct Registry {
    pub(crate) methods: SyncMap<String, bool>,
    pub(crate) resources: SyncMap<String, Arc<ResourceEntry>>,
    pub(crate) resource_templates: SyncMap<String, Arc<ResourceTemplateEntry>>,
    pub(crate) tools: SyncMap<String, Arc<ToolEntry>>,
    pub(crate) prompts: SyncMap<String, Arc<PromptEntry>>,
    warn_on_overwrite: bool,
}

impl Registry {
    /// An empty registry that warns when a registration replaces another.
    pub fn new() -> Self {
        Self {
            methods: SyncMap::new(),
            resources: SyncMap::new(),
            resource_templates: SyncMap::new(),
            tools: SyncMap::new(),
            prompts: SyncMap::new(),
            warn_on_overwrite: true,
        }
    }

    /// Control whether replacing an existing registration logs a warning.
    /// The replacement happens either way.
    pub fn with_overwrite_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_overwrite = enabled;
        self
    }

    pub fn warns_on_overwrite(&self) -> bool {
        self.warn_on_overwrite
    }

    /// Flag `method` as supported by this registry.
    pub fn mark_supported(&self, method: &str) {
        self.methods.put(method.to_string(), true);
    }

    /// Whether a registration has flagged `method` as supported.
    pub fn implements(&self, method: &str) -> bool {
        self.methods.get(method).unwrap_or(false)
    }

    /// Every method flagged as supported, in unspecified order.
    pub fn supported_methods(&self) -> Vec<String> {
        let mut methods = Vec::with_capacity(self.methods.size());
        self.methods.range(|method, supported| {
            if *supported {
                methods.push(method.clone());
            }
            true
        });
        methods
    }

    fn record_insert(&self, kind: &str, key: &str, replaced: bool) {
        if replaced && self.warn_on_overwrite {
            logging::log_registration_overwritten(kind, key);
        } else {
            logging::log_registered(kind, key);
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
