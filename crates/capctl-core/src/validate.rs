use crate::capability::CapabilityDefinition;
use serde::{Deserialize, Serialize};

pub const MISSING_CONTENT_REASON: &str = "At least one attribute or capability is required";

/// Result of structural validation: a status plus a human-readable reason
/// on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ValidationOutcome {
    fn ok() -> Self {
        Self {
            status: true,
            reason: None,
        }
    }

    fn fail(reason: impl Into<String>) -> Self {
        Self {
            status: false,
            reason: Some(reason.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status
    }
}

/// Minimal structural validation before a definition is finalized. Pure.
pub fn validate(definition: &CapabilityDefinition) -> ValidationOutcome {
    if definition.attributes.is_empty() && definition.commands.is_empty() {
        return ValidationOutcome::fail(MISSING_CONTENT_REASON);
    }
    ValidationOutcome::ok()
}
