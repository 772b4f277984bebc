//! Policy engine.
//!
//! A pure function over an ordered list of policies and one context.
//! Evaluation walks the policies in registration order: an abstaining policy
//! (`None`) is skipped; the first deny short-circuits and is the final
//! decision; an allow requesting step-up sets a sticky flag that no later
//! policy can clear. If nothing denies, the result is an allow carrying the
//! accumulated step-up flag.
//!
//! Ordering matters: reordering policies changes which `reason` a denial
//! surfaces (only the first deny is reported), though not whether denial
//! occurs. New policies are additions to the ordered list, not subclasses.

use crate::types::{PolicyContext, PolicyDecision};

/// One independently evaluated authentication policy.
pub trait AuthPolicy: Send + Sync {
    /// Stable policy name, used in logs and audit trails.
    fn name(&self) -> &'static str;

    /// Evaluate the context. `None` abstains.
    fn evaluate(&self, ctx: &PolicyContext) -> Option<PolicyDecision>;
}

/// Composes an ordered list of policies into a single decision.
#[derive(Default)]
pub struct PolicyEngine {
    policies: Vec<Box<dyn AuthPolicy>>,
}

impl PolicyEngine {
    /// Create an empty engine. With no policies registered, every context
    /// evaluates to a plain allow.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a policy to the evaluation order.
    pub fn register(&mut self, policy: Box<dyn AuthPolicy>) {
        self.policies.push(policy);
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with_policy(mut self, policy: Box<dyn AuthPolicy>) -> Self {
        self.register(policy);
        self
    }

    /// Number of registered policies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Whether no policies are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Evaluate all policies against one context.
    #[must_use]
    pub fn evaluate(&self, ctx: &PolicyContext) -> PolicyDecision {
        let mut requires_step_up = false;

        for policy in &self.policies {
            match policy.evaluate(ctx) {
                None => {}
                Some(PolicyDecision::Deny { reason }) => {
                    tracing::debug!(
                        policy = policy.name(),
                        identity_id = %ctx.identity_id,
                        reason = %reason,
                        "policy denied authentication"
                    );
                    return PolicyDecision::Deny { reason };
                }
                Some(PolicyDecision::Allow {
                    requires_step_up: step_up,
                }) => {
                    // Sticky: once requested, step-up survives later allows
                    requires_step_up |= step_up;
                }
            }
        }

        PolicyDecision::Allow { requires_step_up }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyward_core::IdentityId;
    use keyward_domain::AuthMethod;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn context() -> PolicyContext {
        PolicyContext {
            identity_id: IdentityId::new(),
            method: AuthMethod::Passwordless,
            risk_score: 10,
            is_blocked: false,
            is_trusted_device: true,
        }
    }

    /// Fixed-outcome policy that counts how often it is evaluated.
    struct StaticPolicy {
        name: &'static str,
        decision: Option<PolicyDecision>,
        calls: Arc<AtomicUsize>,
    }

    impl StaticPolicy {
        fn boxed(
            name: &'static str,
            decision: Option<PolicyDecision>,
        ) -> (Box<dyn AuthPolicy>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Box::new(Self {
                    name,
                    decision,
                    calls: Arc::clone(&calls),
                }),
                calls,
            )
        }
    }

    impl AuthPolicy for StaticPolicy {
        fn name(&self) -> &'static str {
            self.name
        }

        fn evaluate(&self, _ctx: &PolicyContext) -> Option<PolicyDecision> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.decision.clone()
        }
    }

    #[test]
    fn test_empty_engine_allows_without_step_up() {
        let engine = PolicyEngine::new();
        assert!(engine.is_empty());
        assert_eq!(engine.evaluate(&context()), PolicyDecision::allow());
    }

    #[test]
    fn test_first_deny_short_circuits() {
        let (a, _) = StaticPolicy::boxed("a", None);
        let (b, _) = StaticPolicy::boxed("b", Some(PolicyDecision::deny("risk")));
        let (c, c_calls) = StaticPolicy::boxed("c", Some(PolicyDecision::allow_with_step_up()));

        let engine = PolicyEngine::new()
            .with_policy(a)
            .with_policy(b)
            .with_policy(c);

        assert_eq!(engine.evaluate(&context()), PolicyDecision::deny("risk"));
        // The policy after the deny is never evaluated
        assert_eq!(c_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_step_up_is_sticky() {
        let (a, _) = StaticPolicy::boxed("a", Some(PolicyDecision::allow_with_step_up()));
        let (b, _) = StaticPolicy::boxed("b", Some(PolicyDecision::allow()));

        let engine = PolicyEngine::new().with_policy(a).with_policy(b);

        assert_eq!(
            engine.evaluate(&context()),
            PolicyDecision::allow_with_step_up()
        );
    }

    #[test]
    fn test_abstentions_do_not_affect_outcome() {
        let (a, _) = StaticPolicy::boxed("a", None);
        let (b, _) = StaticPolicy::boxed("b", None);

        let engine = PolicyEngine::new().with_policy(a).with_policy(b);

        assert_eq!(engine.evaluate(&context()), PolicyDecision::allow());
    }

    #[test]
    fn test_first_deny_reason_wins() {
        let (a, _) = StaticPolicy::boxed("a", Some(PolicyDecision::deny("blocked")));
        let (b, b_calls) = StaticPolicy::boxed("b", Some(PolicyDecision::deny("risk")));

        let engine = PolicyEngine::new().with_policy(a).with_policy(b);

        assert_eq!(engine.evaluate(&context()), PolicyDecision::deny("blocked"));
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_deny_overrides_earlier_step_up() {
        let (a, _) = StaticPolicy::boxed("a", Some(PolicyDecision::allow_with_step_up()));
        let (b, _) = StaticPolicy::boxed("b", Some(PolicyDecision::deny("risk")));

        let engine = PolicyEngine::new().with_policy(a).with_policy(b);

        assert_eq!(engine.evaluate(&context()), PolicyDecision::deny("risk"));
    }
}
