//! Handler configuration
//!
//! Server identity, protocol version negotiation and diagnostic switches
//! shared by every handler a factory produces.

use serde::{Deserialize, Serialize};

use crate::schema::LATEST_PROTOCOL_VERSION;

/// Output format for the tracing subscriber installed by [`crate::logging::init_tracing`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" | "pretty" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Configuration for handlers built by this crate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Name reported in `serverInfo`
    pub server_name: String,

    /// Version reported in `serverInfo`
    pub server_version: String,

    /// Protocol version answered when the client asks for one we don't know
    pub protocol_version: String,

    /// Protocol versions accepted verbatim from the client
    pub supported_protocol_versions: Vec<String>,

    /// Optional usage hints returned from `initialize`
    pub instructions: Option<String>,

    /// Emit a warning when a registration replaces an existing entry
    pub warn_on_duplicate_registration: bool,

    pub log_format: LogFormat,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            server_name: "mcp-protocol-server".to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            protocol_version: LATEST_PROTOCOL_VERSION.to_string(),
            supported_protocol_versions: vec![
                "2024-11-05".to_string(),
                "2025-03-26".to_string(),
                LATEST_PROTOCOL_VERSION.to_string(),
            ],
            instructions: None,
            warn_on_duplicate_registration: true,
            log_format: LogFormat::Text,
        }
    }
}

impl HandlerConfig {
    pub fn new(server_name: &str, server_version: &str) -> Self {
        Self {
            server_name: server_name.to_string(),
            server_version: server_version.to_string(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `MCP_SERVER_NAME`, `MCP_SERVER_VERSION`,
    /// `MCP_PROTOCOL_VERSION` and `LOG_FORMAT` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server_name = name;
        }
        if let Ok(version) = std::env::var("MCP_SERVER_VERSION") {
            config.server_version = version;
        }
        if let Ok(protocol) = std::env::var("MCP_PROTOCOL_VERSION") {
            if !config.supported_protocol_versions.contains(&protocol) {
                config.supported_protocol_versions.push(protocol.clone());
            }
            config.protocol_version = protocol;
        }
        if let Some(format) = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|v| LogFormat::parse(&v))
        {
            config.log_format = format;
        }
        config
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Echo the client's version when supported, otherwise answer with ours.
    pub fn negotiate_protocol_version(&self, requested: &str) -> String {
        if self
            .supported_protocol_versions
            .iter()
            .any(|v| v == requested)
        {
            requested.to_string()
        } else {
            self.protocol_version.clone()
        }
    }
}
