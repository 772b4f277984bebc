//! Built-in authentication policies.
//!
//! Each policy evaluates one independent concern; composition order is the
//! deployment's choice when registering them on the engine. Blocklist
//! checks conventionally run first so their reason surfaces on denial.

use crate::engine::AuthPolicy;
use crate::types::{PolicyContext, PolicyDecision};
use keyward_domain::AuthMethod;

/// Denies administratively blocked identities.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockedIdentityPolicy;

impl AuthPolicy for BlockedIdentityPolicy {
    fn name(&self) -> &'static str {
        "blocked_identity"
    }

    fn evaluate(&self, ctx: &PolicyContext) -> Option<PolicyDecision> {
        if ctx.is_blocked {
            Some(PolicyDecision::deny("identity is blocked"))
        } else {
            None
        }
    }
}

/// Thresholds the request's risk score.
///
/// Scores at or above `deny_threshold` deny; scores at or above
/// `step_up_threshold` (but below deny) request step-up; lower scores allow
/// outright.
#[derive(Debug, Clone, Copy)]
pub struct RiskScorePolicy {
    /// Score at which the request is denied.
    pub deny_threshold: u8,
    /// Score at which step-up verification is requested.
    pub step_up_threshold: u8,
}

impl Default for RiskScorePolicy {
    fn default() -> Self {
        Self {
            deny_threshold: 90,
            step_up_threshold: 50,
        }
    }
}

impl AuthPolicy for RiskScorePolicy {
    fn name(&self) -> &'static str {
        "risk_score"
    }

    fn evaluate(&self, ctx: &PolicyContext) -> Option<PolicyDecision> {
        if ctx.risk_score >= self.deny_threshold {
            Some(PolicyDecision::deny(format!(
                "risk score {} exceeds threshold {}",
                ctx.risk_score, self.deny_threshold
            )))
        } else if ctx.risk_score >= self.step_up_threshold {
            Some(PolicyDecision::allow_with_step_up())
        } else {
            Some(PolicyDecision::allow())
        }
    }
}

/// Requests step-up on untrusted devices for knowledge-factor methods.
///
/// Possession-backed methods (WebAuthn, OAuth redirects) already bind to a
/// device or external provider, so this policy abstains for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustedDevicePolicy;

impl AuthPolicy for TrustedDevicePolicy {
    fn name(&self) -> &'static str {
        "trusted_device"
    }

    fn evaluate(&self, ctx: &PolicyContext) -> Option<PolicyDecision> {
        match ctx.method {
            AuthMethod::WebAuthn | AuthMethod::OAuth => None,
            AuthMethod::Passwordless | AuthMethod::Otp | AuthMethod::Password => {
                if ctx.is_trusted_device {
                    Some(PolicyDecision::allow())
                } else {
                    Some(PolicyDecision::allow_with_step_up())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyward_core::IdentityId;

    fn context(risk_score: u8, is_blocked: bool, is_trusted_device: bool) -> PolicyContext {
        PolicyContext {
            identity_id: IdentityId::new(),
            method: AuthMethod::Password,
            risk_score,
            is_blocked,
            is_trusted_device,
        }
    }

    #[test]
    fn test_blocked_identity_denies() {
        let policy = BlockedIdentityPolicy;
        assert_eq!(
            policy.evaluate(&context(0, true, true)),
            Some(PolicyDecision::deny("identity is blocked"))
        );
        assert_eq!(policy.evaluate(&context(0, false, true)), None);
    }

    #[test]
    fn test_risk_score_thresholds() {
        let policy = RiskScorePolicy::default();

        assert_eq!(
            policy.evaluate(&context(10, false, true)),
            Some(PolicyDecision::allow())
        );
        assert_eq!(
            policy.evaluate(&context(50, false, true)),
            Some(PolicyDecision::allow_with_step_up())
        );
        let denied = policy.evaluate(&context(95, false, true)).unwrap();
        assert!(!denied.is_allowed());
    }

    #[test]
    fn test_risk_score_deny_reason_carries_score() {
        let policy = RiskScorePolicy::default();
        match policy.evaluate(&context(92, false, true)) {
            Some(PolicyDecision::Deny { reason }) => {
                assert!(reason.contains("92"));
                assert!(reason.contains("90"));
            }
            other => panic!("expected deny, got {other:?}"),
        }
    }

    #[test]
    fn test_trusted_device_requests_step_up_when_untrusted() {
        let policy = TrustedDevicePolicy;
        assert_eq!(
            policy.evaluate(&context(0, false, false)),
            Some(PolicyDecision::allow_with_step_up())
        );
        assert_eq!(
            policy.evaluate(&context(0, false, true)),
            Some(PolicyDecision::allow())
        );
    }

    #[test]
    fn test_trusted_device_abstains_for_possession_methods() {
        let policy = TrustedDevicePolicy;
        let mut ctx = context(0, false, false);
        ctx.method = AuthMethod::WebAuthn;
        assert_eq!(policy.evaluate(&ctx), None);
        ctx.method = AuthMethod::OAuth;
        assert_eq!(policy.evaluate(&ctx), None);
    }
}
