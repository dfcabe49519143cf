//! Protocol data-transfer types.
//!
//! Plain serde structs mirroring the MCP wire shapes (camelCase fields).
//! The registry stores the metadata types opaquely and hands them back
//! verbatim from the listing operations.

pub mod elicitation;
pub mod initialize;
pub mod jsonrpc;
pub mod prompt;
pub mod resource;
pub mod roots;
pub mod sampling;
pub mod tool;

pub use elicitation::{
    ElicitAction, ElicitRequest, ElicitResult, ElicitationCapability, ELICITATION_MODE_FORM,
    ELICITATION_MODE_URL,
};
pub use initialize::{
    ClientCapabilities, Implementation, InitializeParams, InitializeResult, ListChangedCapability,
    ResourcesCapability, ServerCapabilities,
};
pub use jsonrpc::{LoggingLevel, Notification, PaginatedParams};
pub use prompt::{
    GetPromptParams, GetPromptResult, ListPromptsResult, Prompt, PromptArgument, PromptMessage,
};
pub use resource::{
    ListResourceTemplatesResult, ListResourcesResult, ReadResourceParams, ReadResourceResult,
    Resource, ResourceContents, ResourceTemplate,
};
pub use roots::{ListRootsResult, Root};
pub use sampling::{
    CreateMessageRequest, CreateMessageResult, Message, ModelHint, ModelPreferences,
    SamplingCapability, TokenUsage,
};
pub use tool::{CallToolParams, CallToolResult, Content, ListToolsResult, Role, Tool};

pub const LATEST_PROTOCOL_VERSION: &str = "2025-06-18";

// Lifecycle
pub const METHOD_INITIALIZE: &str = "initialize";
pub const METHOD_PING: &str = "ping";

// Server features
pub const METHOD_RESOURCES_LIST: &str = "resources/list";
pub const METHOD_RESOURCES_READ: &str = "resources/read";
pub const METHOD_RESOURCES_TEMPLATES_LIST: &str = "resources/templates/list";
pub const METHOD_TOOLS_LIST: &str = "tools/list";
pub const METHOD_TOOLS_CALL: &str = "tools/call";
pub const METHOD_PROMPTS_LIST: &str = "prompts/list";
pub const METHOD_PROMPTS_GET: &str = "prompts/get";

// Client features
pub const METHOD_SAMPLING_CREATE_MESSAGE: &str = "sampling/createMessage";
pub const METHOD_ELICITATION_CREATE: &str = "elicitation/create";
pub const METHOD_ROOTS_LIST: &str = "roots/list";

// Notifications
pub const NOTIFICATION_INITIALIZED: &str = "notifications/initialized";
pub const NOTIFICATION_CANCELLED: &str = "notifications/cancelled";
pub const NOTIFICATION_PROGRESS: &str = "notifications/progress";
pub const NOTIFICATION_MESSAGE: &str = "notifications/message";
pub const NOTIFICATION_RESOURCES_LIST_CHANGED: &str = "notifications/resources/list_changed";
pub const NOTIFICATION_RESOURCES_UPDATED: &str = "notifications/resources/updated";
pub const NOTIFICATION_TOOLS_LIST_CHANGED: &str = "notifications/tools/list_changed";
pub const NOTIFICATION_PROMPTS_LIST_CHANGED: &str = "notifications/prompts/list_changed";
pub const NOTIFICATION_ROOTS_LIST_CHANGED: &str = "notifications/roots/list_changed";
