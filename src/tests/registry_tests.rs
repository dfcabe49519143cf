//! Registry Tests
//!
//! Registration, method flags and resource resolution order.

#[cfg(test)]
mod tests {
    use crate::{
        error::McpError,
        schema::{
            CallToolResult, Content, GetPromptResult, Prompt, PromptMessage, ReadResourceParams,
            Resource, ResourceTemplate, Role, Tool, METHOD_PROMPTS_GET, METHOD_PROMPTS_LIST,
            METHOD_RESOURCES_LIST, METHOD_RESOURCES_READ, METHOD_RESOURCES_TEMPLATES_LIST,
            METHOD_TOOLS_CALL, METHOD_TOOLS_LIST,
        },
        server::{Registry, RequestContext},
        tests::{first_text, text_result},
    };
    use schemars::JsonSchema;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use std::sync::Arc;

    fn registry() -> Registry {
        Registry::new().with_overwrite_warnings(false)
    }

    fn register_text(registry: &Registry, uri: &str, body: &'static str) {
        registry.register_resource(Resource::new(uri, uri), move |_ctx, params| async move {
            Ok(text_result(&params.uri, body))
        });
    }

    fn register_text_template(registry: &Registry, template: &str, body: &'static str) {
        registry.register_resource_template(
            ResourceTemplate::new(template, template),
            move |_ctx, params| async move { Ok(text_result(&params.uri, body)) },
        );
    }

    async fn read(registry: &Registry, uri: &str) -> Option<String> {
        let handler = registry.resource_handler(uri)?;
        let result = handler(RequestContext::new(), ReadResourceParams { uri: uri.to_string() })
            .await
            .ok()?;
        Some(first_text(&result).to_string())
    }

    #[test]
    fn test_empty_registry_implements_nothing() {
        let registry = registry();

        for method in [
            METHOD_RESOURCES_LIST,
            METHOD_RESOURCES_READ,
            METHOD_RESOURCES_TEMPLATES_LIST,
            METHOD_TOOLS_LIST,
            METHOD_TOOLS_CALL,
            METHOD_PROMPTS_LIST,
            METHOD_PROMPTS_GET,
        ] {
            assert!(!registry.implements(method), "{method} should be unsupported");
        }
        assert!(registry.supported_methods().is_empty());
        assert!(registry.resource_handler("res://a").is_none());
    }

    #[test]
    fn test_registration_marks_methods() {
        let registry = registry();

        register_text_template(&registry, "res://{id}", "template");
        assert!(registry.implements(METHOD_RESOURCES_TEMPLATES_LIST));
        assert!(!registry.implements(METHOD_RESOURCES_LIST));
        assert!(!registry.implements(METHOD_RESOURCES_READ));

        register_text(&registry, "res://a", "exact");
        assert!(registry.implements(METHOD_RESOURCES_LIST));
        assert!(registry.implements(METHOD_RESOURCES_READ));
        assert!(!registry.implements(METHOD_TOOLS_CALL));

        registry.register_tool(
            Tool::new("echo", "Echo", json!({"type": "object"})),
            |_ctx, _args| async { Ok(CallToolResult::text("ok")) },
        );
        assert!(registry.implements(METHOD_TOOLS_LIST));
        assert!(registry.implements(METHOD_TOOLS_CALL));

        registry.register_prompt(Prompt::new("greet", "Greeting"), |_ctx, _params| async {
            Ok(GetPromptResult {
                description: None,
                messages: Vec::new(),
            })
        });
        assert!(registry.implements(METHOD_PROMPTS_LIST));
        assert!(registry.implements(METHOD_PROMPTS_GET));

        let mut methods = registry.supported_methods();
        methods.sort();
        assert_eq!(methods.len(), 7);
    }

    #[tokio::test]
    async fn test_exact_resource_beats_template() {
        let registry = registry();
        register_text(&registry, "res://a", "exact");
        register_text_template(&registry, "res://{id}", "template");

        assert_eq!(read(&registry, "res://a").await.as_deref(), Some("exact"));
        assert_eq!(read(&registry, "res://b").await.as_deref(), Some("template"));
        assert_eq!(read(&registry, "other://b").await, None);
    }

    #[tokio::test]
    async fn test_template_key_matches_literally() {
        let registry = registry();
        register_text_template(&registry, "config://settings", "static");

        assert_eq!(
            read(&registry, "config://settings").await.as_deref(),
            Some("static")
        );
        assert!(registry.match_resource_template("config://settings").is_some());
        assert!(registry.resource_handler("config://other").is_none());
    }

    #[tokio::test]
    async fn test_malformed_template_is_listed_but_never_matches() {
        let registry = registry();
        register_text_template(&registry, "res://{id", "broken");

        let templates = registry.list_registered_resource_templates();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].uri_template, "res://{id");

        assert!(registry.match_resource_template("res://42").is_none());
        assert!(registry.resource_handler("res://42").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_registration_last_write_wins() {
        for warnings in [true, false] {
            let registry = Registry::new().with_overwrite_warnings(warnings);
            register_text(&registry, "res://a", "first");
            register_text(&registry, "res://a", "second");

            assert_eq!(registry.list_registered_resources().len(), 1);
            assert_eq!(read(&registry, "res://a").await.as_deref(), Some("second"));
        }
    }

    #[test]
    fn test_default_registry_warns_on_overwrite() {
        assert!(Registry::default().warns_on_overwrite());
        assert!(Registry::new().warns_on_overwrite());
        assert!(!Registry::default()
            .with_overwrite_warnings(false)
            .warns_on_overwrite());
        assert!(Registry::default().supported_methods().is_empty());
    }

    #[test]
    fn test_list_registered_resources_returns_metadata() {
        let registry = registry();
        registry.register_resource(
            Resource::new("res://motd", "motd")
                .with_description("Message of the day")
                .with_mime_type("text/plain"),
            |_ctx, params| async move { Ok(text_result(&params.uri, "hi")) },
        );

        let resources = registry.list_registered_resources();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].uri, "res://motd");
        assert_eq!(resources[0].description.as_deref(), Some("Message of the day"));
        assert_eq!(resources[0].mime_type.as_deref(), Some("text/plain"));
    }

    #[derive(Serialize)]
    struct Status {
        healthy: bool,
        uptime: u64,
    }

    #[tokio::test]
    async fn test_typed_resource_encodes_payload() {
        let registry = registry();
        registry.register_typed_resource(
            Resource::new("res://status", "status"),
            |_ctx, _uri| async {
                Ok(Status {
                    healthy: true,
                    uptime: 42,
                })
            },
        );

        let handler = registry.resource_handler("res://status").expect("registered");
        let result = handler(
            RequestContext::new(),
            ReadResourceParams {
                uri: "res://status".to_string(),
            },
        )
        .await
        .expect("typed resource should succeed");

        let contents = &result.contents[0];
        assert_eq!(contents.uri, "res://status");
        assert_eq!(contents.mime_type.as_deref(), Some("application/json"));
        let body: serde_json::Value =
            serde_json::from_str(contents.text.as_deref().expect("text body")).expect("json body");
        assert_eq!(body, json!({"healthy": true, "uptime": 42}));
    }

    #[tokio::test]
    async fn test_typed_resource_passes_errors_through() {
        let registry = registry();
        registry.register_typed_resource(Resource::new("res://fail", "fail"), |_ctx, _uri| async {
            let data = Some(json!({"retry": true}));
            Err::<Status, _>(McpError::rpc(-32001, "backend unavailable", data))
        });

        let handler = registry.resource_handler("res://fail").expect("registered");
        let err = handler(
            RequestContext::new(),
            ReadResourceParams {
                uri: "res://fail".to_string(),
            },
        )
        .await
        .expect_err("handler error should surface");

        assert_eq!(err.error_code(), -32001);
        assert_eq!(err.to_string(), "backend unavailable");
    }

    #[derive(Deserialize, JsonSchema)]
    struct AddInput {
        a: i64,
        b: i64,
    }

    #[derive(Serialize, JsonSchema)]
    struct AddOutput {
        sum: i64,
    }

    #[tokio::test]
    async fn test_typed_tool_round_trip() {
        let registry = registry();
        registry.register_typed_tool("add", "Add two integers", |_ctx, input: AddInput| async move {
            Ok(AddOutput {
                sum: input.a + input.b,
            })
        });

        let tools = registry.list_registered_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "add");
        assert!(tools[0].input_schema.get("properties").is_some());
        assert!(tools[0].output_schema.is_some());

        let handler = registry.tool_handler("add").expect("registered");
        let result = handler(RequestContext::new(), Some(json!({"a": 2, "b": 3})))
            .await
            .expect("valid arguments");
        assert_eq!(result.structured_content, Some(json!({"sum": 5})));
        match &result.content[0] {
            Content::Text { text } => assert_eq!(text, r#"{"sum":5}"#),
            other => panic!("expected text content, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_typed_tool_rejects_bad_arguments() {
        let registry = registry();
        registry.register_typed_tool("add", "Add two integers", |_ctx, input: AddInput| async move {
            Ok(AddOutput {
                sum: input.a + input.b,
            })
        });

        let handler = registry.tool_handler("add").expect("registered");
        let err = handler(RequestContext::new(), Some(json!({"a": "two"})))
            .await
            .expect_err("bad arguments");
        assert!(matches!(err, McpError::InvalidParams(_)));

        let err = handler(RequestContext::new(), None)
            .await
            .expect_err("missing fields");
        assert!(matches!(err, McpError::InvalidParams(_)));
    }

    #[tokio::test]
    async fn test_prompt_lookup() {
        let registry = registry();
        registry.register_prompt(
            Prompt::new("greet", "Greeting").with_argument("name", "Who to greet", true),
            |_ctx, params| async move {
                let name = params
                    .arguments
                    .and_then(|args| args.get("name").cloned())
                    .unwrap_or_default();
                Ok(GetPromptResult {
                    description: None,
                    messages: vec![PromptMessage {
                        role: Role::User,
                        content: Content::text(format!("Hello, {name}")),
                    }],
                })
            },
        );

        let prompts = registry.list_registered_prompts();
        assert_eq!(prompts.len(), 1);
        assert!(registry.prompt_handler("missing").is_none());

        let handler = registry.prompt_handler("greet").expect("registered");
        let params = serde_json::from_value(json!({"name": "greet", "arguments": {"name": "Ada"}}))
            .expect("prompt params");
        let result = handler(RequestContext::new(), params).await.expect("prompt");
        match &result.messages[0].content {
            Content::Text { text } => assert_eq!(text, "Hello, Ada"),
            other => panic!("expected text content, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registration_and_resolution() {
        let registry = Arc::new(registry());
        register_text_template(&registry, "item://{id}", "template");

        let mut tasks = Vec::new();
        for i in 0..16 {
            let registry = Arc::clone(&registry);
            tasks.push(tokio::spawn(async move {
                let uri = format!("item://exact-{i}");
                registry.register_resource(
                    Resource::new(uri.clone(), "item"),
                    |_ctx, params| async move { Ok(text_result(&params.uri, "exact")) },
                );
                for _ in 0..50 {
                    assert!(registry.resource_handler(&uri).is_some());
                    assert!(registry.resource_handler("item://anything").is_some());
                    registry.list_registered_resources();
                }
            }));
        }
        for task in tasks {
            task.await.expect("task panicked");
        }

        assert_eq!(registry.list_registered_resources().len(), 16);
        assert_eq!(read(&registry, "item://exact-3").await.as_deref(), Some("exact"));
        assert_eq!(read(&registry, "item://other").await.as_deref(), Some("template"));
    }
}
