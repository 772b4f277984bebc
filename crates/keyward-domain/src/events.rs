//! Domain events emitted by the authentication aggregates.
//!
//! Events are immutable facts. Aggregates record them as operations run;
//! orchestrating services drain them with `take_events()` after a successful
//! save and hand them to the [`EventPublisher`](crate::ports::EventPublisher)
//! port in one batch.
//!
//! Event type names follow the `<service>.<entity>.<action>` convention.
//! Payloads must never carry secrets.

use chrono::{DateTime, Utc};
use keyward_core::{AttemptId, ChallengeId, IdentityId, MfaSessionId};
use serde::Serialize;

use crate::types::{AuthMethod, ChallengeChannel, Destination};

/// Facts the authentication domain can emit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event_type")]
pub enum AuthEvent {
    /// An authentication attempt entered PENDING.
    #[serde(rename = "authentication_started")]
    AuthenticationStarted {
        /// The new attempt
        attempt_id: AttemptId,
        /// The method being attempted
        method: AuthMethod,
    },

    /// An attempt reached SUCCEEDED.
    #[serde(rename = "authentication_succeeded")]
    AuthenticationSucceeded {
        /// The completed attempt
        attempt_id: AttemptId,
    },

    /// An attempt reached FAILED.
    #[serde(rename = "authentication_failed")]
    AuthenticationFailed {
        /// The completed attempt
        attempt_id: AttemptId,
    },

    /// A multi-factor verification session was opened.
    #[serde(rename = "auth.mfa.session_started")]
    MfaSessionStarted {
        /// The new session
        session_id: MfaSessionId,
        /// The identity being verified
        identity_id: IdentityId,
    },

    /// A passwordless challenge was issued for out-of-band delivery.
    #[serde(rename = "auth.passwordless.challenge_created")]
    PasswordlessChallengeCreated {
        /// The challenge
        challenge_id: ChallengeId,
        /// Delivery channel
        channel: ChallengeChannel,
        /// Delivery address
        destination: Destination,
        /// When the challenge stops being usable
        expires_at: DateTime<Utc>,
    },

    /// A passwordless challenge was verified with the correct secret.
    #[serde(rename = "auth.passwordless.challenge_verified")]
    PasswordlessChallengeVerified {
        /// The challenge
        challenge_id: ChallengeId,
        /// Delivery channel
        channel: ChallengeChannel,
        /// Delivery address
        destination: Destination,
        /// The injected time of verification
        verified_at: DateTime<Utc>,
    },
}

impl AuthEvent {
    /// The fully qualified event type name, stable across serialization.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::AuthenticationStarted { .. } => "authentication_started",
            Self::AuthenticationSucceeded { .. } => "authentication_succeeded",
            Self::AuthenticationFailed { .. } => "authentication_failed",
            Self::MfaSessionStarted { .. } => "auth.mfa.session_started",
            Self::PasswordlessChallengeCreated { .. } => "auth.passwordless.challenge_created",
            Self::PasswordlessChallengeVerified { .. } => "auth.passwordless.challenge_verified",
        }
    }
}

/// An event plus the instant it was recorded at.
///
/// The timestamp is the injected `now` of the operation that recorded the
/// event (for challenge creation, the challenge's `issued_at`), never a
/// fresh wall-clock read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedEvent {
    /// When the fact occurred, per the injected clock.
    pub occurred_at: DateTime<Utc>,
    /// The fact itself.
    #[serde(flatten)]
    pub event: AuthEvent,
}

impl RecordedEvent {
    /// Wrap an event with its occurrence time.
    #[must_use]
    pub fn new(occurred_at: DateTime<Utc>, event: AuthEvent) -> Self {
        Self { occurred_at, event }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChallengeChannel;

    #[test]
    fn test_event_type_names() {
        let event = AuthEvent::AuthenticationStarted {
            attempt_id: AttemptId::new(),
            method: AuthMethod::Passwordless,
        };
        assert_eq!(event.event_type(), "authentication_started");

        let event = AuthEvent::MfaSessionStarted {
            session_id: MfaSessionId::new(),
            identity_id: IdentityId::new(),
        };
        assert_eq!(event.event_type(), "auth.mfa.session_started");
    }

    #[test]
    fn test_serialized_tag_matches_event_type() {
        let destination = Destination::new(ChallengeChannel::Email, "user@example.com").unwrap();
        let event = AuthEvent::PasswordlessChallengeCreated {
            challenge_id: ChallengeId::new(),
            channel: ChallengeChannel::Email,
            destination,
            expires_at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json.get("event_type").and_then(|v| v.as_str()),
            Some(event.event_type())
        );
        assert_eq!(
            json.get("channel").and_then(|v| v.as_str()),
            Some("email")
        );
    }

    #[test]
    fn test_recorded_event_flattens_payload() {
        let occurred_at = Utc::now();
        let attempt_id = AttemptId::new();
        let recorded = RecordedEvent::new(
            occurred_at,
            AuthEvent::AuthenticationSucceeded { attempt_id },
        );
        let json = serde_json::to_value(&recorded).unwrap();
        assert_eq!(
            json.get("event_type").and_then(|v| v.as_str()),
            Some("authentication_succeeded")
        );
        assert_eq!(
            json.get("attempt_id").and_then(|v| v.as_str()),
            Some(attempt_id.to_string().as_str())
        );
        assert!(json.get("occurred_at").is_some());
    }

    #[test]
    fn test_verified_event_carries_no_secret_field() {
        let destination = Destination::new(ChallengeChannel::Sms, "+14155550100").unwrap();
        let event = AuthEvent::PasswordlessChallengeVerified {
            challenge_id: ChallengeId::new(),
            channel: ChallengeChannel::Sms,
            destination,
            verified_at: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("secret"));
    }
}
