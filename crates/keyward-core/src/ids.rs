//! Strongly Typed Identifiers
//!
//! This module provides type-safe identifier types for Keyward.
//! Using the newtype pattern, these types prevent accidental misuse of
//! different ID types at compile time.
//!
//! # Example
//!
//! ```
//! use keyward_core::{AttemptId, MfaSessionId};
//!
//! let attempt = AttemptId::new();
//! let session = MfaSessionId::new();
//!
//! // Type safety: cannot pass MfaSessionId where AttemptId is expected
//! fn requires_attempt(id: AttemptId) -> String {
//!     id.to_string()
//! }
//!
//! let result = requires_attempt(attempt);
//! // requires_attempt(session); // This would not compile!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Error type for ID parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse
    pub id_type: &'static str,
    /// The underlying UUID parse error message
    pub message: String,
}

impl Display for ParseIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse {}: {}", self.id_type, self.message)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to define a strongly-typed ID type
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random ID using UUID v4.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns a reference to the underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| ParseIdError {
                        id_type: stringify!($name),
                        message: e.to_string(),
                    })
            }
        }
    };
}

define_id!(
    /// Strongly typed identifier for authentication attempts.
    ///
    /// Identifies one PENDING -> terminal authentication attempt.
    /// Provides compile-time type safety to prevent confusion with other ID types.
    ///
    /// # Example
    ///
    /// ```
    /// use keyward_core::AttemptId;
    /// use uuid::Uuid;
    ///
    /// // Create a new random AttemptId
    /// let attempt_id = AttemptId::new();
    /// println!("Attempt: {}", attempt_id);
    ///
    /// // Create from existing UUID
    /// let uuid = Uuid::new_v4();
    /// let attempt_id = AttemptId::from_uuid(uuid);
    /// assert_eq!(attempt_id.as_uuid(), &uuid);
    ///
    /// // Parse from string
    /// let attempt_id: AttemptId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
    /// ```
    AttemptId
);

define_id!(
    /// Strongly typed identifier for the subject of an authentication flow.
    ///
    /// An opaque reference to the identity being authenticated. The domain
    /// core never dereferences it; it only carries it through events and
    /// repository lookups.
    IdentityId
);

define_id!(
    /// Strongly typed identifier for multi-factor verification sessions.
    ///
    /// # Example
    ///
    /// ```
    /// use keyward_core::MfaSessionId;
    ///
    /// let session_id = MfaSessionId::new();
    /// println!("Session: {}", session_id);
    /// ```
    MfaSessionId
);

define_id!(
    /// Strongly typed identifier for challenges (MFA and passwordless).
    ///
    /// # Example
    ///
    /// ```
    /// use keyward_core::ChallengeId;
    ///
    /// let challenge_id = ChallengeId::new();
    /// println!("Challenge: {}", challenge_id);
    /// ```
    ChallengeId
);
