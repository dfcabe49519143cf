//! Prompt registration methods for Registry.

use futures_util::FutureExt;
use std::{future::Future, sync::Arc};

use crate::{
    error::McpResult,
    schema::{GetPromptParams, GetPromptResult, Prompt, METHOD_PROMPTS_GET, METHOD_PROMPTS_LIST},
    server::context::RequestContext,
};

use super::{PromptEntry, PromptHandlerFunc, Registry};

impl Registry {
    /// Register a prompt keyed by `prompt.name`; marks `prompts/list` and `prompts/get`.
    pub fn register_prompt<F, Fut>(&self, prompt: Prompt, handler: F)
    where
        F: Fn(RequestContext, GetPromptParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<GetPromptResult>> + Send + 'static,
    {
        self.mark_supported(METHOD_PROMPTS_LIST);
        self.mark_supported(METHOD_PROMPTS_GET);

        let handler: PromptHandlerFunc = Arc::new(move |ctx, params| handler(ctx, params).boxed());
        let name = prompt.name.clone();
        let entry = Arc::new(PromptEntry {
            handler,
            metadata: prompt,
        });
        let replaced = self.prompts.put(name.clone(), entry).is_some();
        self.record_insert("prompt", &name, replaced);
    }

    /// Metadata for all registered prompts, in unspecified order.
    pub fn list_registered_prompts(&self) -> Vec<Prompt> {
        let mut list = Vec::with_capacity(self.prompts.size());
        self.prompts.range(|_, entry| {
            list.push(entry.metadata.clone());
            true
        });
        list
    }

    pub fn prompt_handler(&self, name: &str) -> Option<PromptHandlerFunc> {
        self.prompts.get(name).map(|entry| entry.handler.clone())
    }
}
