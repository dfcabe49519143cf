//! Tool registration methods for Registry.

use futures_util::FutureExt;
use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::{future::Future, sync::Arc};

use crate::{
    error::{McpError, McpResult},
    schema::{CallToolResult, Content, Tool, METHOD_TOOLS_CALL, METHOD_TOOLS_LIST},
    server::context::RequestContext,
};

use super::{Registry, ToolEntry, ToolHandlerFunc};

impl Registry {
    /// Register a tool keyed by `tool.name`; marks `tools/list` and `tools/call`.
    pub fn register_tool<F, Fut>(&self, tool: Tool, handler: F)
    where
        F: Fn(RequestContext, Option<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<CallToolResult>> + Send + 'static,
    {
        let handler: ToolHandlerFunc = Arc::new(move |ctx, args| handler(ctx, args).boxed());
        self.register_tool_handler(tool, handler);
    }

    pub fn register_tool_handler(&self, tool: Tool, handler: ToolHandlerFunc) {
        self.mark_supported(METHOD_TOOLS_LIST);
        self.mark_supported(METHOD_TOOLS_CALL);

        let name = tool.name.clone();
        let entry = Arc::new(ToolEntry {
            handler,
            metadata: tool,
        });
        let replaced = self.tools.put(name.clone(), entry).is_some();
        self.record_insert("tool", &name, replaced);
    }

    /// Register a tool with typed input and output.
    ///
    /// Input and output schemas are generated from `I` and `O`. Arguments
    /// that fail to deserialize produce `InvalidParams`; the output is
    /// returned both as JSON text content and as `structuredContent`.
    ///
    /// # Examples
    /// ```rust
    /// use mcp_protocol::server::Registry;
    /// use schemars::JsonSchema;
    /// use serde::{Deserialize, Serialize};
    ///
    /// #[derive(Deserialize, JsonSchema)]
    /// struct AddInput { a: i64, b: i64 }
    ///
    /// #[derive(Serialize, JsonSchema)]
    /// struct AddOutput { sum: i64 }
    ///
    /// let registry = Registry::new();
    /// registry.register_typed_tool("add", "Add two integers", |_ctx, input: AddInput| async move {
    ///     Ok(AddOutput { sum: input.a + input.b })
    /// });
    /// assert!(registry.implements("tools/call"));
    /// ```
    pub fn register_typed_tool<I, O, F, Fut>(&self, name: &str, description: &str, handler: F)
    where
        I: JsonSchema + DeserializeOwned + Send + 'static,
        O: JsonSchema + Serialize + Send + 'static,
        F: Fn(RequestContext, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<O>> + Send + 'static,
    {
        let tool = Tool::from_schemas::<I, O>(name, description);
        let handler = Arc::new(handler);
        let tool_name = name.to_string();

        self.register_tool(tool, move |ctx, args: Option<Value>| {
            let handler = Arc::clone(&handler);
            let tool_name = tool_name.clone();
            async move {
                let args = args.unwrap_or_else(|| Value::Object(Default::default()));
                let input: I = serde_json::from_value(args).map_err(|e| {
                    McpError::InvalidParams(format!("invalid arguments for '{tool_name}': {e}"))
                })?;
                let output = handler(ctx, input).await?;
                let structured = serde_json::to_value(&output)?;
                Ok::<_, McpError>(CallToolResult {
                    content: vec![Content::text(structured.to_string())],
                    structured_content: Some(structured),
                    is_error: None,
                })
            }
        });
    }

    /// Metadata for all registered tools, in unspecified order.
    pub fn list_registered_tools(&self) -> Vec<Tool> {
        let mut list = Vec::with_capacity(self.tools.size());
        self.tools.range(|_, entry| {
            list.push(entry.metadata.clone());
            true
        });
        list
    }

    pub fn tool_handler(&self, name: &str) -> Option<ToolHandlerFunc> {
        self.tools.get(name).map(|entry| entry.handler.clone())
    }
}
