//! # keyward-domain
//!
//! Domain core of the Keyward authentication platform.
//!
//! Governs how an authentication attempt, a multi-factor verification
//! session, and a passwordless challenge move through their lifecycles.
//! Every operation is a synchronous, pure state transition plus optional
//! event recording; persistence, transport, and delivery sit behind the
//! [`ports`] traits and all wall-clock access is injected
//! (`keyward_core::Clock`).
//!
//! ## Modules
//!
//! - [`types`] - Value primitives: methods, channels, destinations, secrets
//! - [`attempt`] - Authentication attempt state machine
//! - [`mfa`] - MFA session and challenge
//! - [`passwordless`] - Single-use passwordless challenge
//! - [`events`] - Immutable domain events
//! - [`error`] - Typed error taxonomy
//! - [`ports`] - Collaborator contracts (repositories, publisher, delivery)
//!
//! ## Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use keyward_core::{ChallengeId, IdentityId};
//! use keyward_domain::passwordless::PasswordlessChallenge;
//! use keyward_domain::types::{ChallengeChannel, ChallengeSecret, Destination};
//!
//! let issued_at = Utc::now();
//! let mut challenge = PasswordlessChallenge::issue(
//!     ChallengeId::new(),
//!     Some(IdentityId::new()),
//!     ChallengeChannel::Email,
//!     Destination::new(ChallengeChannel::Email, "user@example.com")?,
//!     ChallengeSecret::new("431986")?,
//!     issued_at,
//!     issued_at + Duration::seconds(300),
//! )?;
//!
//! challenge.verify("431986", issued_at + Duration::seconds(10))?;
//! assert!(challenge.verified_at().is_some());
//! # Ok::<(), keyward_domain::AuthDomainError>(())
//! ```

pub mod attempt;
pub mod error;
pub mod events;
pub mod mfa;
pub mod passwordless;
pub mod ports;
pub mod types;

pub use attempt::{AttemptStatus, AttemptView, AuthenticationAttempt};
pub use error::{AuthDomainError, Result};
pub use events::{AuthEvent, RecordedEvent};
pub use mfa::{MfaChallenge, MfaChallengeView, MfaSession, MfaSessionView};
pub use passwordless::{PasswordlessChallenge, PasswordlessChallengeView, PasswordlessStatus};
pub use types::{
    AuthMethod, ChallengeChannel, ChallengeSecret, Destination, MfaChallengeType,
};
