//! Keyward Core Library
//!
//! Shared types for the Keyward authentication platform.
//!
//! # Modules
//!
//! - [`ids`] - Strongly typed identifiers (AttemptId, MfaSessionId, ChallengeId, IdentityId)
//! - [`clock`] - Injected time source (Clock, SystemClock, FixedClock)
//!
//! # Example
//!
//! ```
//! use keyward_core::{AttemptId, Clock, SystemClock};
//!
//! let attempt_id = AttemptId::new();
//! let clock = SystemClock;
//! let now = clock.now();
//! println!("attempt {attempt_id} observed at {now}");
//! ```

pub mod clock;
pub mod ids;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ids::{AttemptId, ChallengeId, IdentityId, MfaSessionId, ParseIdError};
