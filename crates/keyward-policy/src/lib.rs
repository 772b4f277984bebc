//! # keyward-policy
//!
//! Authentication policy engine for Keyward.
//!
//! Composes independently evaluated policies (risk, blocklist, device
//! trust) into a single allow/deny decision over a read-only
//! [`PolicyContext`]. First deny wins and short-circuits; step-up requests
//! accumulate monotonically across allowing policies.
//!
//! ## Example
//!
//! ```
//! use keyward_core::IdentityId;
//! use keyward_domain::AuthMethod;
//! use keyward_policy::{
//!     BlockedIdentityPolicy, PolicyContext, PolicyDecision, PolicyEngine, RiskScorePolicy,
//!     TrustedDevicePolicy,
//! };
//!
//! let engine = PolicyEngine::new()
//!     .with_policy(Box::new(BlockedIdentityPolicy))
//!     .with_policy(Box::new(RiskScorePolicy::default()))
//!     .with_policy(Box::new(TrustedDevicePolicy));
//!
//! let decision = engine.evaluate(&PolicyContext {
//!     identity_id: IdentityId::new(),
//!     method: AuthMethod::Passwordless,
//!     risk_score: 20,
//!     is_blocked: false,
//!     is_trusted_device: true,
//! });
//! assert_eq!(decision, PolicyDecision::allow());
//! ```

pub mod engine;
pub mod policies;
pub mod types;

pub use engine::{AuthPolicy, PolicyEngine};
pub use policies::{BlockedIdentityPolicy, RiskScorePolicy, TrustedDevicePolicy};
pub use types::{PolicyContext, PolicyDecision};
