//! Client capability negotiation.
//!
//! The client's `initialize` params carry one loosely-typed section per
//! optional feature. This module reads those sections leniently: a
//! missing field or a field of the wrong type reads as its zero value, and
//! only a missing section (or missing initialize params) yields `None`.
//! Nothing here returns an error; callers that need a feature use
//! [`Negotiator::require_sampling`] / [`Negotiator::require_elicitation`].

use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::{
    error::{McpError, McpResult},
    logging,
    schema::{ElicitationCapability, InitializeParams, SamplingCapability},
};

/// Parse a `sampling` capability section.
pub fn parse_sampling(section: &Value) -> SamplingCapability {
    SamplingCapability {
        enabled: read_bool(section, "enabled"),
        supports_tools: read_bool(section, "supportsTools"),
    }
}

/// Parse an `elicitation` capability section; non-string modes are dropped.
pub fn parse_elicitation(section: &Value) -> ElicitationCapability {
    let enabled = read_bool(section, "enabled");
    if section.get("enabled").is_some_and(|v| !v.is_boolean()) {
        debug!(raw = %section["enabled"], "elicitation: enabled field has wrong type");
    }

    let supported_modes = match section.get("supportedModes").and_then(Value::as_array) {
        Some(modes) => modes
            .iter()
            .filter_map(|mode| mode.as_str().map(str::to_string))
            .collect(),
        None => {
            debug!(
                raw = ?section.get("supportedModes"),
                "elicitation: supportedModes missing or wrong type"
            );
            Vec::new()
        }
    };

    ElicitationCapability {
        enabled,
        supported_modes,
    }
}

fn read_bool(section: &Value, field: &str) -> bool {
    section.get(field).and_then(Value::as_bool).unwrap_or(false)
}

/// Derives capability descriptors from the recorded initialize params.
///
/// Descriptors are recomputed on every query so they always reflect the
/// latest initialization.
#[derive(Debug, Default)]
pub struct Negotiator {
    client_initialize: RwLock<Option<Arc<InitializeParams>>>,
}

impl Negotiator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the client's initialize params, replacing any earlier ones.
    pub fn record_initialize(&self, params: InitializeParams) {
        *self.client_initialize.write() = Some(Arc::new(params));
    }

    pub fn client_initialize(&self) -> Option<Arc<InitializeParams>> {
        self.client_initialize.read().clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.client_initialize.read().is_some()
    }

    pub fn sampling_capability(&self) -> Option<SamplingCapability> {
        let Some(init) = self.client_initialize() else {
            debug!("sampling: client has not initialized");
            return None;
        };
        let section = init.capabilities.sampling.as_ref()?;
        let capability = parse_sampling(section);
        debug!(
            enabled = capability.enabled,
            supports_tools = capability.supports_tools,
            "sampling: parsed capability"
        );
        Some(capability)
    }

    pub fn elicitation_capability(&self) -> Option<ElicitationCapability> {
        let Some(init) = self.client_initialize() else {
            debug!("elicitation: client has not initialized");
            return None;
        };
        let Some(section) = init.capabilities.elicitation.as_ref() else {
            debug!("elicitation: capability section absent");
            return None;
        };
        let capability = parse_elicitation(section);
        debug!(
            enabled = capability.enabled,
            modes = ?capability.supported_modes,
            "elicitation: parsed capability"
        );
        Some(capability)
    }

    pub fn can_sample(&self) -> bool {
        self.sampling_capability().is_some_and(|cap| cap.enabled)
    }

    pub fn can_elicit(&self) -> bool {
        self.elicitation_capability().is_some_and(|cap| cap.enabled)
    }

    /// Whether the client listed `mode` among its elicitation modes.
    ///
    /// Looks only at `supportedModes`; pair with [`Negotiator::can_elicit`]
    /// to also require the feature to be enabled.
    pub fn supports_elicitation_mode(&self, mode: &str) -> bool {
        self.elicitation_capability()
            .is_some_and(|cap| cap.supports_mode(mode))
    }

    /// Fail with `SamplingNotSupported` unless sampling (and tool-enabled
    /// sampling when `needs_tools`) is available.
    pub fn require_sampling(&self, needs_tools: bool) -> McpResult<SamplingCapability> {
        match self.sampling_capability() {
            Some(cap) if cap.enabled && (!needs_tools || cap.supports_tools) => Ok(cap),
            Some(cap) if cap.enabled => {
                logging::log_capability_unsupported("sampling", Some("tools"));
                Err(McpError::SamplingNotSupported)
            }
            _ => {
                logging::log_capability_unsupported("sampling", None);
                Err(McpError::SamplingNotSupported)
            }
        }
    }

    /// Fail with `ElicitationNotSupported` unless elicitation is enabled
    /// and `mode` is one of the client's supported modes.
    pub fn require_elicitation(&self, mode: &str) -> McpResult<ElicitationCapability> {
        match self.elicitation_capability() {
            Some(cap) if cap.enabled && cap.supports_mode(mode) => Ok(cap),
            Some(cap) if cap.enabled => {
                logging::log_capability_unsupported("elicitation", Some(mode));
                Err(McpError::ElicitationNotSupported)
            }
            _ => {
                logging::log_capability_unsupported("elicitation", None);
                Err(McpError::ElicitationNotSupported)
            }
        }
    }
}
