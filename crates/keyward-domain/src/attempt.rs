//! Authentication attempt aggregate.
//!
//! Tracks exactly one PENDING -> {SUCCEEDED | FAILED} transition. Terminal
//! states are final; finalizing twice raises
//! [`AuthDomainError::AlreadyCompleted`] and leaves the aggregate unchanged.

use chrono::{DateTime, Utc};
use keyward_core::{AttemptId, IdentityId};
use serde::Serialize;

use crate::error::AuthDomainError;
use crate::events::{AuthEvent, RecordedEvent};
use crate::types::AuthMethod;
use crate::Result;

/// Minimum length of a failure reason, after trimming.
pub const MIN_FAILURE_REASON_LEN: usize = 3;

/// Lifecycle status of an authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    /// The only non-terminal state.
    Pending,
    /// Terminal: the attempt completed successfully.
    Succeeded,
    /// Terminal: the attempt failed.
    Failed,
}

impl AttemptStatus {
    /// Convert to the wire string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// Parse from the wire string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "succeeded" => Some(Self::Succeeded),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Whether no further transition is permitted from this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// One authentication attempt moving through its lifecycle.
#[derive(Debug, Clone)]
pub struct AuthenticationAttempt {
    id: AttemptId,
    method: AuthMethod,
    identity_id: Option<IdentityId>,
    status: AttemptStatus,
    failure_reason: Option<String>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    events: Vec<RecordedEvent>,
}

/// Projection of an attempt for callers outside the domain.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptView {
    /// The attempt id.
    pub id: AttemptId,
    /// The method being attempted.
    pub method: AuthMethod,
    /// Optional identity reference.
    pub identity_id: Option<IdentityId>,
    /// Current status.
    pub status: AttemptStatus,
    /// Failure reason, present only for FAILED attempts.
    pub failure_reason: Option<String>,
    /// When the attempt was started.
    pub started_at: DateTime<Utc>,
    /// When the attempt reached a terminal state.
    pub completed_at: Option<DateTime<Utc>>,
}

impl AuthenticationAttempt {
    /// Start a new attempt at PENDING and record `authentication_started`.
    #[must_use]
    pub fn start(
        id: AttemptId,
        method: AuthMethod,
        identity_id: Option<IdentityId>,
        now: DateTime<Utc>,
    ) -> Self {
        tracing::debug!(attempt_id = %id, method = %method, "authentication attempt started");
        Self {
            id,
            method,
            identity_id,
            status: AttemptStatus::Pending,
            failure_reason: None,
            started_at: now,
            completed_at: None,
            events: vec![RecordedEvent::new(
                now,
                AuthEvent::AuthenticationStarted {
                    attempt_id: id,
                    method,
                },
            )],
        }
    }

    /// Rehydrate a persisted attempt without recording any event.
    #[must_use]
    pub fn restore(
        id: AttemptId,
        method: AuthMethod,
        identity_id: Option<IdentityId>,
        status: AttemptStatus,
        failure_reason: Option<String>,
        started_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            method,
            identity_id,
            status,
            failure_reason,
            started_at,
            completed_at,
            events: Vec::new(),
        }
    }

    /// Transition PENDING -> SUCCEEDED and record `authentication_succeeded`.
    pub fn succeed(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.ensure_pending()?;
        self.status = AttemptStatus::Succeeded;
        self.completed_at = Some(now);
        self.events.push(RecordedEvent::new(
            now,
            AuthEvent::AuthenticationSucceeded { attempt_id: self.id },
        ));
        tracing::debug!(attempt_id = %self.id, "authentication attempt succeeded");
        Ok(())
    }

    /// Transition PENDING -> FAILED and record `authentication_failed`.
    ///
    /// The reason must hold at least [`MIN_FAILURE_REASON_LEN`] characters
    /// after trimming.
    pub fn fail(&mut self, reason: impl Into<String>, now: DateTime<Utc>) -> Result<()> {
        self.ensure_pending()?;
        let reason = reason.into();
        if reason.trim().len() < MIN_FAILURE_REASON_LEN {
            return Err(AuthDomainError::Validation {
                field: "reason",
                message: format!(
                    "failure reason must hold at least {MIN_FAILURE_REASON_LEN} characters"
                ),
            });
        }
        self.status = AttemptStatus::Failed;
        self.failure_reason = Some(reason);
        self.completed_at = Some(now);
        self.events.push(RecordedEvent::new(
            now,
            AuthEvent::AuthenticationFailed { attempt_id: self.id },
        ));
        tracing::debug!(attempt_id = %self.id, "authentication attempt failed");
        Ok(())
    }

    fn ensure_pending(&self) -> Result<()> {
        if self.status.is_terminal() {
            return Err(AuthDomainError::AlreadyCompleted {
                attempt_id: self.id,
                status: self.status.as_str(),
            });
        }
        Ok(())
    }

    /// Drain the events recorded since the last drain.
    pub fn take_events(&mut self) -> Vec<RecordedEvent> {
        std::mem::take(&mut self.events)
    }

    /// The attempt id.
    #[must_use]
    pub fn id(&self) -> AttemptId {
        self.id
    }

    /// The method being attempted.
    #[must_use]
    pub fn method(&self) -> AuthMethod {
        self.method
    }

    /// Optional identity reference.
    #[must_use]
    pub fn identity_id(&self) -> Option<IdentityId> {
        self.identity_id
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> AttemptStatus {
        self.status
    }

    /// Failure reason, present only for FAILED attempts.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// Projection for callers outside the domain.
    #[must_use]
    pub fn to_view(&self) -> AttemptView {
        AttemptView {
            id: self.id,
            method: self.method,
            identity_id: self.identity_id,
            status: self.status,
            failure_reason: self.failure_reason.clone(),
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }
}
