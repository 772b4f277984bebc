//! Domain error taxonomy.
//!
//! Every failure the aggregates can raise is a typed condition carrying the
//! ids, counters, and timestamps an audit log needs. The domain never
//! produces user-facing text; orchestrating services translate these into
//! whatever their callers expect.

use chrono::{DateTime, Utc};
use keyward_core::{AttemptId, ChallengeId, MfaSessionId};
use thiserror::Error;

/// Errors raised by the authentication domain core.
///
/// Grouped by kind:
///
/// - invalid value: [`Validation`](AuthDomainError::Validation) — raised at
///   construction, fatal to that construction call
/// - invalid state: [`AlreadyCompleted`](AuthDomainError::AlreadyCompleted),
///   [`AlreadyVerified`](AuthDomainError::AlreadyVerified),
///   [`ActiveChallengeExists`](AuthDomainError::ActiveChallengeExists),
///   [`AlreadyUsed`](AuthDomainError::AlreadyUsed) — the aggregate is left
///   unchanged
/// - expired: [`Expired`](AuthDomainError::Expired) — time-bound resource
///   used past its window, aggregate unchanged
/// - exceeded: [`AttemptsExceeded`](AuthDomainError::AttemptsExceeded) — the
///   session must be treated as unsalvageable for further attempts
/// - not found: [`NotFound`](AuthDomainError::NotFound) — raised by
///   orchestrating services on repository misses, never by an aggregate
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthDomainError {
    /// Input validation failure at construction time.
    #[error("Validation error on field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: &'static str,
        /// Description of the validation failure
        message: String,
    },

    /// An authentication attempt was finalized twice.
    #[error("Authentication attempt {attempt_id} already completed with status {status}")]
    AlreadyCompleted {
        /// The attempt that was already terminal
        attempt_id: AttemptId,
        /// The terminal status it holds
        status: &'static str,
    },

    /// An operation was invoked on an MFA session that is already verified.
    #[error("MFA session {session_id} is already verified")]
    AlreadyVerified {
        /// The verified session
        session_id: MfaSessionId,
    },

    /// A challenge was issued while another unexpired challenge is held.
    #[error("MFA session {session_id} holds active challenge {challenge_id}")]
    ActiveChallengeExists {
        /// The session holding the challenge
        session_id: MfaSessionId,
        /// The unexpired challenge blocking issuance
        challenge_id: ChallengeId,
    },

    /// The verification attempt counter surpassed its configured ceiling.
    #[error("MFA session {session_id} exceeded attempts: {used} of {max}")]
    AttemptsExceeded {
        /// The overflowing session
        session_id: MfaSessionId,
        /// Attempts consumed, including the overflowing one
        used: u32,
        /// The configured ceiling
        max: u32,
    },

    /// A time-bound challenge was used past its expiry window.
    #[error("Challenge {challenge_id} expired at {expires_at} (now {now})")]
    Expired {
        /// The expired challenge
        challenge_id: ChallengeId,
        /// When its window closed
        expires_at: DateTime<Utc>,
        /// The injected time of the rejected operation
        now: DateTime<Utc>,
    },

    /// A single-use challenge was verified a second time.
    #[error("Challenge {challenge_id} already used (status {status})")]
    AlreadyUsed {
        /// The consumed challenge
        challenge_id: ChallengeId,
        /// The terminal status it holds
        status: &'static str,
    },

    /// The supplied secret did not match the stored one.
    #[error("Secret mismatch for challenge {challenge_id}")]
    SecretMismatch {
        /// The challenge whose secret was wrong
        challenge_id: ChallengeId,
    },

    /// A repository lookup missed. Raised by orchestrating services.
    #[error("{resource} not found{}", id.as_ref().map(|i| format!(": {i}")).unwrap_or_default())]
    NotFound {
        /// The type of resource that was not found (e.g., "MfaSession")
        resource: &'static str,
        /// Optional identifier of the resource
        id: Option<String>,
    },

    /// Infrastructure failure behind a port (repository, publisher, delivery).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Type alias for Results using [`AuthDomainError`].
pub type Result<T> = std::result::Result<T, AuthDomainError>;
