//! Passwordless challenge aggregate.
//!
//! A single-use, time-boxed secret delivered out-of-band and verified by
//! constant-time secret comparison. Verification is atomic: either every
//! check passes and the terminal transition happens, or the aggregate is
//! left completely unchanged.

use chrono::{DateTime, Utc};
use keyward_core::{ChallengeId, IdentityId};
use serde::Serialize;

use crate::error::AuthDomainError;
use crate::events::{AuthEvent, RecordedEvent};
use crate::types::{ChallengeChannel, ChallengeSecret, Destination};
use crate::Result;

/// Lifecycle status of a passwordless challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordlessStatus {
    /// Issued and awaiting verification.
    Issued,
    /// Terminal: verified with the correct secret.
    Verified,
    /// Terminal: swept after its window closed.
    Expired,
}

impl PasswordlessStatus {
    /// Convert to the wire string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issued => "issued",
            Self::Verified => "verified",
            Self::Expired => "expired",
        }
    }

    /// Parse from the wire string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "issued" => Some(Self::Issued),
            "verified" => Some(Self::Verified),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

/// A single-use passwordless challenge.
#[derive(Debug, Clone)]
pub struct PasswordlessChallenge {
    id: ChallengeId,
    identity_id: Option<IdentityId>,
    channel: ChallengeChannel,
    destination: Destination,
    secret: ChallengeSecret,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    status: PasswordlessStatus,
    verified_at: Option<DateTime<Utc>>,
    events: Vec<RecordedEvent>,
}

/// Projection of a challenge for callers outside the domain.
///
/// Never includes the secret, regardless of status.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordlessChallengeView {
    /// The challenge id.
    pub id: ChallengeId,
    /// Delivery channel.
    pub channel: ChallengeChannel,
    /// Delivery address.
    pub destination: Destination,
    /// When the challenge was issued.
    pub issued_at: DateTime<Utc>,
    /// When the challenge window closes.
    pub expires_at: DateTime<Utc>,
    /// Current status.
    pub status: PasswordlessStatus,
    /// Derived expiry flag relative to the projection's `now`.
    pub expired: bool,
}

impl PasswordlessChallenge {
    /// Issue a challenge and record `auth.passwordless.challenge_created`.
    ///
    /// The channel and secret invariants are enforced by [`Destination`] and
    /// [`ChallengeSecret`] at their construction; this factory validates the
    /// expiry window and timestamps the created event at `issued_at`.
    pub fn issue(
        id: ChallengeId,
        identity_id: Option<IdentityId>,
        channel: ChallengeChannel,
        destination: Destination,
        secret: ChallengeSecret,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Self> {
        if expires_at <= issued_at {
            return Err(AuthDomainError::Validation {
                field: "expires_at",
                message: format!("expires_at {expires_at} must be after issued_at {issued_at}"),
            });
        }
        tracing::debug!(
            challenge_id = %id,
            channel = %channel,
            "passwordless challenge issued"
        );
        let created = RecordedEvent::new(
            issued_at,
            AuthEvent::PasswordlessChallengeCreated {
                challenge_id: id,
                channel,
                destination: destination.clone(),
                expires_at,
            },
        );
        Ok(Self {
            id,
            identity_id,
            channel,
            destination,
            secret,
            issued_at,
            expires_at,
            status: PasswordlessStatus::Issued,
            verified_at: None,
            events: vec![created],
        })
    }

    /// Rehydrate a persisted challenge without recording any event.
    pub fn restore(
        id: ChallengeId,
        identity_id: Option<IdentityId>,
        channel: ChallengeChannel,
        destination: Destination,
        secret: ChallengeSecret,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        status: PasswordlessStatus,
        verified_at: Option<DateTime<Utc>>,
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
            channel,
            destination,
            secret,
            issued_at,
            expires_at,
            status,
            verified_at,
            events: Vec::new(),
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

    /// Constant-time comparison of a caller-supplied secret.
    #[must_use]
    pub fn matches_secret(&self, input: &str) -> bool {
        self.secret.matches(input)
    }

    /// Verify the challenge with the supplied secret at `now`.
    ///
    /// Ordered checks: expiry, then single-use status, then secret match.
    /// Every failure path leaves the challenge unchanged; on success the
    /// status becomes [`PasswordlessStatus::Verified`] exactly once and
    /// `auth.passwordless.challenge_verified` is recorded.
    pub fn verify(&mut self, secret_input: &str, now: DateTime<Utc>) -> Result<()> {
        if self.is_expired(now) {
            return Err(AuthDomainError::Expired {
                challenge_id: self.id,
                expires_at: self.expires_at,
                now,
            });
        }
        if self.status != PasswordlessStatus::Issued {
            return Err(AuthDomainError::AlreadyUsed {
                challenge_id: self.id,
                status: self.status.as_str(),
            });
        }
        if !self.matches_secret(secret_input) {
            tracing::debug!(challenge_id = %self.id, "passwordless secret mismatch");
            return Err(AuthDomainError::SecretMismatch {
                challenge_id: self.id,
            });
        }
        self.status = PasswordlessStatus::Verified;
        self.verified_at = Some(now);
        self.events.push(RecordedEvent::new(
            now,
            AuthEvent::PasswordlessChallengeVerified {
                challenge_id: self.id,
                channel: self.channel,
                destination: self.destination.clone(),
                verified_at: now,
            },
        ));
        tracing::debug!(challenge_id = %self.id, "passwordless challenge verified");
        Ok(())
    }

    /// Sweep an issued challenge whose window has closed into the terminal
    /// `Expired` status.
    ///
    /// Intended for repository cleanup passes. Fails with `AlreadyUsed` on a
    /// terminal challenge and with a validation error while the window is
    /// still open.
    pub fn mark_expired(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.status != PasswordlessStatus::Issued {
            return Err(AuthDomainError::AlreadyUsed {
                challenge_id: self.id,
                status: self.status.as_str(),
            });
        }
        if !self.is_expired(now) {
            return Err(AuthDomainError::Validation {
                field: "expires_at",
                message: format!("challenge window is open until {}", self.expires_at),
            });
        }
        self.status = PasswordlessStatus::Expired;
        Ok(())
    }

    /// Drain the events recorded since the last drain.
    pub fn take_events(&mut self) -> Vec<RecordedEvent> {
        std::mem::take(&mut self.events)
    }

    /// The challenge id.
    #[must_use]
    pub fn id(&self) -> ChallengeId {
        self.id
    }

    /// The identity this challenge was issued for, if known.
    #[must_use]
    pub fn identity_id(&self) -> Option<IdentityId> {
        self.identity_id
    }

    /// Delivery channel.
    #[must_use]
    pub fn channel(&self) -> ChallengeChannel {
        self.channel
    }

    /// Delivery address.
    #[must_use]
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// The stored secret, for handing to the delivery port only.
    #[must_use]
    pub fn secret(&self) -> &ChallengeSecret {
        &self.secret
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

    /// Current status.
    #[must_use]
    pub fn status(&self) -> PasswordlessStatus {
        self.status
    }

    /// When verification completed, if it has.
    #[must_use]
    pub fn verified_at(&self) -> Option<DateTime<Utc>> {
        self.verified_at
    }

    /// Projection for callers outside the domain. Never exposes the secret.
    #[must_use]
    pub fn to_view(&self, now: DateTime<Utc>) -> PasswordlessChallengeView {
        PasswordlessChallengeView {
            id: self.id,
            channel: self.channel,
            destination: self.destination.clone(),
            issued_at: self.issued_at,
            expires_at: self.expires_at,
            status: self.status,
            expired: self.is_expired(now),
        }
    }
}
