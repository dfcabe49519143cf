use serde_json::Value;
use thiserror::Error;

/// JSON-RPC 2.0 reserved error codes used when mapping [`McpError`].
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const NOT_INITIALIZED: i32 = -32002;
    pub const RESOURCE_NOT_FOUND: i32 = -32002;
}

#[derive(Debug, Error)]
pub enum McpError {
    // Protocol Errors
    #[error("Method not found: {0}")]
    UnknownMethod(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Not initialized")]
    NotInitialized,

    // Lookup Errors
    #[error("Tool not found: {0}")]
    UnknownTool(String),

    #[error("Resource not found: {0}")]
    UnknownResource(String),

    #[error("Prompt not found: {0}")]
    UnknownPrompt(String),

    // Capability Errors
    #[error("client does not support sampling")]
    SamplingNotSupported,

    #[error("client does not support elicitation")]
    ElicitationNotSupported,

    /// A protocol-level error produced by a registered handler.
    #[error("{message}")]
    Rpc {
        code: i32,
        message: String,
        data: Option<Value>,
    },

    #[error("Notification delivery failed: {0}")]
    Notification(String),

    // JSON Errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Internal Errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl McpError {
    /// Build a handler error carrying an explicit JSON-RPC code.
    pub fn rpc(code: i32, message: impl Into<String>, data: Option<Value>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
            data,
        }
    }

    /// True for the two sentinel errors raised when the peer lacks an optional feature.
    pub fn is_capability_unsupported(&self) -> bool {
        matches!(self, Self::SamplingNotSupported | Self::ElicitationNotSupported)
    }

    /// Convert to JSON-RPC error code
    pub fn error_code(&self) -> i32 {
        match self {
            Self::UnknownMethod(_) | Self::UnknownTool(_) | Self::UnknownPrompt(_) => {
                codes::METHOD_NOT_FOUND
            }
            Self::SamplingNotSupported | Self::ElicitationNotSupported => codes::METHOD_NOT_FOUND,
            Self::UnknownResource(_) => codes::RESOURCE_NOT_FOUND,
            Self::InvalidParams(_) => codes::INVALID_PARAMS,
            Self::Json(_) => codes::PARSE_ERROR,
            Self::NotInitialized => codes::NOT_INITIALIZED,
            Self::Rpc { code, .. } => *code,
            Self::Notification(_) | Self::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Create JSON-RPC error response
    pub fn to_json_rpc_error(&self, id: Option<Value>) -> Value {
        let mut error = serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
        });
        match self {
            Self::Rpc { data: Some(data), .. } => {
                error["data"] = data.clone();
            }
            Self::UnknownResource(uri) => {
                error["data"] = serde_json::json!({ "uri": uri });
            }
            _ => {}
        }
        serde_json::json!({
            "jsonrpc": "2.0",
            "error": error,
            "id": id,
        })
    }
}

// Result type alias for convenience
pub type McpResult<T> = Result<T, McpError>;

// Handlers written against anyhow can use `?` directly
impl From<anyhow::Error> for McpError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<McpError>() {
            Ok(mcp) => mcp,
            Err(other) => McpError::Internal(other.to_string()),
        }
    }
}
