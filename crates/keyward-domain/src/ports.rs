//! Collaborator ports consumed by orchestrating services.
//!
//! The domain core performs no I/O of its own. Persistence, event
//! publication, and out-of-band delivery are reached through these traits;
//! adapters map their infrastructure failures into
//! [`AuthDomainError::Internal`](crate::AuthDomainError::Internal).
//!
//! Repositories must provide single-writer semantics per aggregate id (row
//! lock, advisory lock, or optimistic version check) — the domain performs
//! no locking, and two interleaved load-mutate-save cycles on the same
//! aggregate lose updates.

use async_trait::async_trait;
use keyward_core::{AttemptId, ChallengeId, IdentityId, MfaSessionId};

use crate::attempt::AuthenticationAttempt;
use crate::events::RecordedEvent;
use crate::mfa::MfaSession;
use crate::passwordless::PasswordlessChallenge;
use crate::types::{ChallengeSecret, Destination};
use crate::Result;

/// Persistence for authentication attempts.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Load an attempt by id.
    async fn find_by_id(&self, id: AttemptId) -> Result<Option<AuthenticationAttempt>>;

    /// Persist the attempt's current state.
    async fn save(&self, attempt: &AuthenticationAttempt) -> Result<()>;
}

/// Persistence for MFA sessions.
#[async_trait]
pub trait MfaSessionRepository: Send + Sync {
    /// Load a session by id.
    async fn find_by_id(&self, id: MfaSessionId) -> Result<Option<MfaSession>>;

    /// Load the active session for an identity, if one exists.
    ///
    /// "Active" is this query's decision, not the aggregate's: typically
    /// unverified and not past a retention window.
    async fn find_active_by_identity(&self, identity_id: IdentityId)
        -> Result<Option<MfaSession>>;

    /// Persist the session's current state.
    async fn save(&self, session: &MfaSession) -> Result<()>;
}

/// Persistence for passwordless challenges.
#[async_trait]
pub trait PasswordlessChallengeRepository: Send + Sync {
    /// Load a challenge by id.
    async fn find_by_id(&self, id: ChallengeId) -> Result<Option<PasswordlessChallenge>>;

    /// Persist the challenge's current state.
    async fn save(&self, challenge: &PasswordlessChallenge) -> Result<()>;
}

/// Outbound publication of recorded domain events.
///
/// Called once per use case after a save succeeds, with the batch drained
/// from the aggregate.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a batch of events.
    async fn publish(&self, events: &[RecordedEvent]) -> Result<()>;
}

/// Out-of-band delivery of a challenge secret.
///
/// Delivery failure semantics (retries, bounce handling) belong to the
/// channel, not the domain.
#[async_trait]
pub trait ChallengeDelivery: Send + Sync {
    /// Send the secret to the destination.
    async fn deliver(&self, destination: &Destination, secret: &ChallengeSecret) -> Result<()>;
}
