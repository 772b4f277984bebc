//! Multi-factor verification session and challenge.
//!
//! A session aggregates at most one active challenge at a time, a bounded
//! verification attempt counter, and a single verification outcome. All
//! expiry comparisons are driven by the caller-injected `now`.
//!
//! Verification contract: `verify` does not itself check that a non-expired
//! challenge was matched — the caller must have validated the factor (code,
//! assertion, approval) against the active challenge before calling
//! `mark_attempt` and then `verify`. On success the working set of
//! challenges is consumed, so a verified session never holds an active
//! challenge.

use chrono::{DateTime, Utc};
use keyward_core::{ChallengeId, IdentityId, MfaSessionId};
use serde::Serialize;

use crate::error::AuthDomainError;
use crate::events::{AuthEvent, RecordedEvent};
use crate::types::MfaChallengeType;
use crate::Result;

/// A time-boxed second-factor challenge.
///
/// Immutable once created; only derived time comparisons depend on state
/// outside the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MfaChallenge {
    id: ChallengeId,
    identity_id: IdentityId,
    challenge_type: MfaChallengeType,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl MfaChallenge {
    /// Create a challenge. The expiry window must be strictly positive.
    pub fn new(
        id: ChallengeId,
        identity_id: IdentityId,
        challenge_type: MfaChallengeType,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Self> {
        if expires_at <= issued_at {
            return Err(AuthDomainError::Validation {
                field: "expires_at",
                message: format!("expires_at {expires_at} must be after issued_at {issued_at}"),
            });
        }
        Ok(Self {
            id,
            identity_id,
            challenge_type,
            issued_at,
            expires_at,
        })
    }

    /// Whether the challenge window has closed.
    ///
    /// Strictly greater: at the exact expiry instant the challenge is still
    /// valid.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// The challenge id.
    #[must_use]
    pub fn id(&self) -> ChallengeId {
        self.id
    }

    /// The identity this challenge verifies.
    #[must_use]
    pub fn identity_id(&self) -> IdentityId {
        self.identity_id
    }

    /// The challenge type.
    #[must_use]
    pub fn challenge_type(&self) -> MfaChallengeType {
        self.challenge_type
    }

    /// When the challenge was issued.
    #[must_use]
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// When the challenge window closes.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// Projection of a held challenge.
#[derive(Debug, Clone, Serialize)]
pub struct MfaChallengeView {
    /// The challenge id.
    pub id: ChallengeId,
    /// The challenge type.
    pub challenge_type: MfaChallengeType,
    /// When the challenge was issued.
    pub issued_at: DateTime<Utc>,
    /// When the challenge window closes.
    pub expires_at: DateTime<Utc>,
    /// Derived expiry flag relative to the projection's `now`.
    pub expired: bool,
}

/// A multi-factor verification session for one identity.
#[derive(Debug, Clone)]
pub struct MfaSession {
    id: MfaSessionId,
    identity_id: IdentityId,
    challenges: Vec<MfaChallenge>,
    max_attempts: u32,
    attempts_used: u32,
    verified_at: Option<DateTime<Utc>>,
    events: Vec<RecordedEvent>,
}

/// Projection of a session for callers outside the domain.
#[derive(Debug, Clone, Serialize)]
pub struct MfaSessionView {
    /// The session id.
    pub id: MfaSessionId,
    /// The identity being verified.
    pub identity_id: IdentityId,
    /// Configured attempt ceiling.
    pub max_attempts: u32,
    /// Attempts consumed so far.
    pub attempts_used: u32,
    /// When verification completed, if it has.
    pub verified_at: Option<DateTime<Utc>>,
    /// Challenges currently held by the session.
    pub challenges: Vec<MfaChallengeView>,
}

impl MfaSession {
    /// Open a session and record `auth.mfa.session_started`.
    ///
    /// `max_attempts` is fixed for the session's lifetime and must be at
    /// least 1.
    pub fn start(
        id: MfaSessionId,
        identity_id: IdentityId,
        max_attempts: u32,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if max_attempts == 0 {
            return Err(AuthDomainError::Validation {
                field: "max_attempts",
                message: "max_attempts must be at least 1".to_string(),
            });
        }
        tracing::debug!(session_id = %id, identity_id = %identity_id, "mfa session started");
        Ok(Self {
            id,
            identity_id,
            challenges: Vec::new(),
            max_attempts,
            attempts_used: 0,
            verified_at: None,
            events: vec![RecordedEvent::new(
                now,
                AuthEvent::MfaSessionStarted {
                    session_id: id,
                    identity_id,
                },
            )],
        })
    }

    /// Rehydrate a persisted session without recording any event.
    pub fn restore(
        id: MfaSessionId,
        identity_id: IdentityId,
        challenges: Vec<MfaChallenge>,
        max_attempts: u32,
        attempts_used: u32,
        verified_at: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        if max_attempts == 0 {
            return Err(AuthDomainError::Validation {
                field: "max_attempts",
                message: "max_attempts must be at least 1".to_string(),
            });
        }
        Ok(Self {
            id,
            identity_id,
            challenges,
            max_attempts,
            attempts_used,
            verified_at,
            events: Vec::new(),
        })
    }

    /// Append a challenge to the session.
    ///
    /// Fails if the session is already verified, if the challenge was issued
    /// for a different identity, or if any held challenge is still unexpired
    /// at `now`.
    pub fn issue_challenge(&mut self, challenge: MfaChallenge, now: DateTime<Utc>) -> Result<()> {
        self.ensure_unverified()?;
        if challenge.identity_id() != self.identity_id {
            return Err(AuthDomainError::Validation {
                field: "identity_id",
                message: format!(
                    "challenge identity {} does not match session identity {}",
                    challenge.identity_id(),
                    self.identity_id
                ),
            });
        }
        if let Some(active) = self.active_challenge(now) {
            return Err(AuthDomainError::ActiveChallengeExists {
                session_id: self.id,
                challenge_id: active.id(),
            });
        }
        tracing::debug!(
            session_id = %self.id,
            challenge_id = %challenge.id(),
            challenge_type = %challenge.challenge_type(),
            "mfa challenge issued"
        );
        self.challenges.push(challenge);
        Ok(())
    }

    /// Consume one verification attempt, then re-validate the ceiling.
    ///
    /// Must be called before the caller validates the submitted factor. On
    /// overflow the counter stays incremented and the session must be
    /// treated as unsalvageable for further attempts; every subsequent call
    /// keeps failing.
    pub fn mark_attempt(&mut self) -> Result<()> {
        self.attempts_used += 1;
        if self.attempts_used > self.max_attempts {
            tracing::warn!(
                session_id = %self.id,
                attempts_used = self.attempts_used,
                max_attempts = self.max_attempts,
                "mfa attempts exceeded"
            );
            return Err(AuthDomainError::AttemptsExceeded {
                session_id: self.id,
                used: self.attempts_used,
                max: self.max_attempts,
            });
        }
        Ok(())
    }

    /// Stamp the verification outcome.
    ///
    /// Fails if already verified. Consumes the held challenges so the
    /// verified session holds zero active challenges; see the module
    /// documentation for the caller contract.
    pub fn verify(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.ensure_unverified()?;
        self.challenges.clear();
        self.verified_at = Some(now);
        tracing::debug!(session_id = %self.id, "mfa session verified");
        Ok(())
    }

    fn ensure_unverified(&self) -> Result<()> {
        if self.verified_at.is_some() {
            return Err(AuthDomainError::AlreadyVerified {
                session_id: self.id,
            });
        }
        Ok(())
    }

    /// The held challenge that is still unexpired at `now`, if any.
    #[must_use]
    pub fn active_challenge(&self, now: DateTime<Utc>) -> Option<&MfaChallenge> {
        self.challenges.iter().find(|c| !c.is_expired(now))
    }

    /// Drain the events recorded since the last drain.
    pub fn take_events(&mut self) -> Vec<RecordedEvent> {
        std::mem::take(&mut self.events)
    }

    /// The session id.
    #[must_use]
    pub fn id(&self) -> MfaSessionId {
        self.id
    }

    /// The identity being verified.
    #[must_use]
    pub fn identity_id(&self) -> IdentityId {
        self.identity_id
    }

    /// Configured attempt ceiling.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Attempts consumed so far.
    #[must_use]
    pub fn attempts_used(&self) -> u32 {
        self.attempts_used
    }

    /// Attempts still available before the ceiling.
    #[must_use]
    pub fn attempts_remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts_used)
    }

    /// Whether the session completed verification.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }

    /// When verification completed, if it has.
    #[must_use]
    pub fn verified_at(&self) -> Option<DateTime<Utc>> {
        self.verified_at
    }

    /// Projection for callers outside the domain.
    #[must_use]
    pub fn to_view(&self, now: DateTime<Utc>) -> MfaSessionView {
        MfaSessionView {
            id: self.id,
            identity_id: self.identity_id,
            max_attempts: self.max_attempts,
            attempts_used: self.attempts_used,
            verified_at: self.verified_at,
            challenges: self
                .challenges
                .iter()
                .map(|c| MfaChallengeView {
                    id: c.id(),
                    challenge_type: c.challenge_type(),
                    issued_at: c.issued_at(),
                    expires_at: c.expires_at(),
                    expired: c.is_expired(now),
                })
                .collect(),
        }
    }
}
