//! Context and decision value types for policy evaluation.
//!
//! Both are produced per evaluation and discarded after use; neither has an
//! identity or lifecycle of its own.

use keyward_core::IdentityId;
use keyward_domain::AuthMethod;
use serde::Serialize;

/// Read-only fact bundle consumed by policies.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyContext {
    /// The identity requesting authentication.
    pub identity_id: IdentityId,
    /// The method being attempted.
    pub method: AuthMethod,
    /// Risk score for this request, 0 (benign) to 100 (hostile). How the
    /// score is obtained is outside this engine.
    pub risk_score: u8,
    /// Whether the identity is administratively blocked.
    pub is_blocked: bool,
    /// Whether the request comes from a device the identity has trusted.
    pub is_trusted_device: bool,
}

/// Outcome of evaluating one policy, or of the whole engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PolicyDecision {
    /// Hard deny; `reason` identifies the denying policy's rationale.
    Deny {
        /// Why the request was denied.
        reason: String,
    },
    /// Allow, possibly requesting additional verification.
    Allow {
        /// Whether a step-up factor is required before proceeding.
        requires_step_up: bool,
    },
}

impl PolicyDecision {
    /// A hard deny with the given reason.
    #[must_use]
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }

    /// A plain allow.
    #[must_use]
    pub fn allow() -> Self {
        Self::Allow {
            requires_step_up: false,
        }
    }

    /// An allow that requests step-up verification.
    #[must_use]
    pub fn allow_with_step_up() -> Self {
        Self::Allow {
            requires_step_up: true,
        }
    }

    /// Whether the decision permits the request.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert!(PolicyDecision::allow().is_allowed());
        assert!(PolicyDecision::allow_with_step_up().is_allowed());
        assert!(!PolicyDecision::deny("blocked").is_allowed());
    }

    #[test]
    fn test_decision_serialization() {
        let json = serde_json::to_value(PolicyDecision::deny("risk")).unwrap();
        assert_eq!(json.get("outcome").and_then(|v| v.as_str()), Some("deny"));
        assert_eq!(json.get("reason").and_then(|v| v.as_str()), Some("risk"));

        let json = serde_json::to_value(PolicyDecision::allow_with_step_up()).unwrap();
        assert_eq!(json.get("outcome").and_then(|v| v.as_str()), Some("allow"));
        assert_eq!(
            json.get("requires_step_up").and_then(|v| v.as_bool()),
            Some(true)
        );
    }
}
