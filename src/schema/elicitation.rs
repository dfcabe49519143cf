use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ELICITATION_MODE_FORM: &str = "form";
pub const ELICITATION_MODE_URL: &str = "url";

/// `elicitation/create` request asking the client to collect user input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElicitRequest {
    /// Why the input is needed, shown to the user.
    pub message: String,
    /// `form` or `url`
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_schema: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ElicitRequest {
    pub fn form(message: impl Into<String>, schema: Map<String, Value>) -> Self {
        Self {
            message: message.into(),
            mode: ELICITATION_MODE_FORM.to_string(),
            form_schema: Some(schema),
            url: None,
        }
    }

    pub fn url(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            mode: ELICITATION_MODE_URL.to_string(),
            form_schema: None,
            url: Some(url.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElicitAction {
    Accept,
    Decline,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElicitResult {
    pub action: ElicitAction,
    #[serde(default)]
    pub content: Map<String, Value>,
}

/// Strongly-typed view of the client's `elicitation` capability section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElicitationCapability {
    pub enabled: bool,
    pub supported_modes: Vec<String>,
}

impl ElicitationCapability {
    pub fn supports_mode(&self, mode: &str) -> bool {
        self.supported_modes.iter().any(|m| m == mode)
    }
}
