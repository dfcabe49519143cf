//! Resource and resource-template registration and URI resolution.

use futures_util::FutureExt;
use serde::Serialize;
use std::{future::Future, sync::Arc};

use crate::{
    error::{McpError, McpResult},
    logging,
    schema::{
        ReadResourceParams, ReadResourceResult, Resource, ResourceContents, ResourceTemplate,
        METHOD_RESOURCES_LIST, METHOD_RESOURCES_READ, METHOD_RESOURCES_TEMPLATES_LIST,
    },
    server::{context::RequestContext, template::UriTemplate},
};

use super::{Registry, ResourceEntry, ResourceHandlerFunc, ResourceTemplateEntry};

const JSON_MIME_TYPE: &str = "application/json";

impl Registry {
    /// Register a resource keyed by `resource.uri`.
    ///
    /// Marks `resources/list` and `resources/read` as supported. A later
    /// registration under the same URI replaces this one.
    pub fn register_resource<F, Fut>(&self, resource: Resource, handler: F)
    where
        F: Fn(RequestContext, ReadResourceParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<ReadResourceResult>> + Send + 'static,
    {
        let handler: ResourceHandlerFunc =
            Arc::new(move |ctx, params| handler(ctx, params).boxed());
        self.register_resource_handler(resource, handler);
    }

    /// Register an already boxed resource handler.
    pub fn register_resource_handler(&self, resource: Resource, handler: ResourceHandlerFunc) {
        self.mark_supported(METHOD_RESOURCES_LIST);
        self.mark_supported(METHOD_RESOURCES_READ);

        let uri = resource.uri.clone();
        let entry = Arc::new(ResourceEntry {
            handler,
            metadata: resource,
        });
        let replaced = self.resources.put(uri.clone(), entry).is_some();
        self.record_insert("resource", &uri, replaced);
    }

    /// Register a resource whose handler returns any serializable payload.
    ///
    /// The payload is JSON-encoded into a single text entry of
    /// `ReadResourceResult::contents`, tagged with the resource's MIME type
    /// (or `application/json`). Errors from `handler` are returned as is.
    pub fn register_typed_resource<T, F, Fut>(&self, resource: Resource, handler: F)
    where
        T: Serialize + Send + 'static,
        F: Fn(RequestContext, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<T>> + Send + 'static,
    {
        let mime_type = resource
            .mime_type
            .clone()
            .unwrap_or_else(|| JSON_MIME_TYPE.to_string());
        let handler = Arc::new(handler);

        self.register_resource(resource, move |ctx, params: ReadResourceParams| {
            let handler = Arc::clone(&handler);
            let mime_type = mime_type.clone();
            async move {
                let payload = handler(ctx, params.uri.clone()).await?;
                let text = serde_json::to_string(&payload)?;
                Ok::<_, McpError>(ReadResourceResult {
                    contents: vec![ResourceContents::text(params.uri, Some(mime_type), text)],
                })
            }
        });
    }

    /// Register a resource template keyed by `template.uri_template`.
    ///
    /// Marks `resources/templates/list` as supported. The template is
    /// compiled once here; a malformed template is stored but never matches.
    pub fn register_resource_template<F, Fut>(&self, template: ResourceTemplate, handler: F)
    where
        F: Fn(RequestContext, ReadResourceParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<ReadResourceResult>> + Send + 'static,
    {
        let handler: ResourceHandlerFunc =
            Arc::new(move |ctx, params| handler(ctx, params).boxed());
        self.register_resource_template_handler(template, handler);
    }

    pub fn register_resource_template_handler(
        &self,
        template: ResourceTemplate,
        handler: ResourceHandlerFunc,
    ) {
        self.mark_supported(METHOD_RESOURCES_TEMPLATES_LIST);

        let key = template.uri_template.clone();
        let compiled = UriTemplate::parse(&key);
        if let Some(err) = compiled.error() {
            logging::log_malformed_template(&key, &err.to_string());
        }
        let entry = Arc::new(ResourceTemplateEntry {
            handler,
            metadata: template,
            template: compiled,
        });
        let replaced = self.resource_templates.put(key.clone(), entry).is_some();
        self.record_insert("resource_template", &key, replaced);
    }

    /// Metadata for all registered resources, in unspecified order.
    pub fn list_registered_resources(&self) -> Vec<Resource> {
        let mut list = Vec::with_capacity(self.resources.size());
        self.resources.range(|_, entry| {
            list.push(entry.metadata.clone());
            true
        });
        list
    }

    /// Metadata for all registered resource templates, in unspecified order.
    pub fn list_registered_resource_templates(&self) -> Vec<ResourceTemplate> {
        let mut list = Vec::with_capacity(self.resource_templates.size());
        self.resource_templates.range(|_, entry| {
            list.push(entry.metadata.clone());
            true
        });
        list
    }

    /// Resolve the handler for `uri`.
    ///
    /// Exact resource URIs win, then a template key equal to `uri`, then the
    /// first template (in map order) whose pattern matches. `None` means no
    /// match; turning that into a protocol error is the caller's job.
    pub fn resource_handler(&self, uri: &str) -> Option<ResourceHandlerFunc> {
        if let Some(entry) = self.resources.get(uri) {
            logging::log_resource_resolved(uri, "exact", uri);
            return Some(entry.handler.clone());
        }

        if let Some(entry) = self.resource_templates.get(uri) {
            logging::log_resource_resolved(uri, "template_literal", uri);
            return Some(entry.handler.clone());
        }

        match self.match_resource_template(uri) {
            Some(entry) => {
                logging::log_resource_resolved(uri, "template_pattern", entry.template.as_str());
                Some(entry.handler.clone())
            }
            None => {
                logging::log_resource_not_found(uri);
                None
            }
        }
    }

    /// First template entry whose pattern matches `uri`, ignoring exact keys.
    pub fn match_resource_template(&self, uri: &str) -> Option<Arc<ResourceTemplateEntry>> {
        let mut matched = None;
        self.resource_templates.range(|_, entry| {
            if entry.template.is_match(uri) {
                matched = Some(Arc::clone(entry));
                return false;
            }
            true
        });
        matched
    }
}
