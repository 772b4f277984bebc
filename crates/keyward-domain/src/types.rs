//! Value primitives for the authentication domain.
//!
//! Each type validates its own invariant at construction and is compared by
//! value. Enumerations are closed per deployment; unknown tags are rejected
//! at the parse boundary rather than defaulted.

use crate::error::AuthDomainError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;

/// Authentication methods supported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Magic link or out-of-band code, no password involved.
    Passwordless,
    /// One-time password (TOTP or delivered code).
    Otp,
    /// WebAuthn / passkey assertion.
    #[serde(rename = "webauthn")]
    WebAuthn,
    /// Delegated authentication via an external provider.
    #[serde(rename = "oauth")]
    OAuth,
    /// Classic password credential.
    Password,
}

impl AuthMethod {
    /// Convert to the wire string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passwordless => "passwordless",
            Self::Otp => "otp",
            Self::WebAuthn => "webauthn",
            Self::OAuth => "oauth",
            Self::Password => "password",
        }
    }

    /// Parse from the wire string representation.
    ///
    /// Unknown tags are rejected; the method registry is closed per
    /// deployment.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "passwordless" => Some(Self::Passwordless),
            "otp" => Some(Self::Otp),
            "webauthn" => Some(Self::WebAuthn),
            "oauth" => Some(Self::OAuth),
            "password" => Some(Self::Password),
            _ => None,
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery channels for passwordless challenges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeChannel {
    /// Email delivery (magic link or code).
    Email,
    /// SMS delivery.
    Sms,
    /// Code generated in an authenticator application.
    AuthenticatorApp,
    /// Push notification to an enrolled device.
    Push,
}

impl ChallengeChannel {
    /// Convert to the wire string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::AuthenticatorApp => "authenticator_app",
            Self::Push => "push",
        }
    }

    /// Parse from the wire string representation. Unknown tags are rejected.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "email" => Some(Self::Email),
            "sms" => Some(Self::Sms),
            "authenticator_app" => Some(Self::AuthenticatorApp),
            "push" => Some(Self::Push),
            _ => None,
        }
    }
}

impl fmt::Display for ChallengeChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Types of second-factor challenges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MfaChallengeType {
    /// Time-based one-time password.
    Totp,
    /// Code delivered via email.
    EmailOtp,
    /// Code delivered via SMS.
    SmsOtp,
    /// WebAuthn assertion.
    #[serde(rename = "webauthn")]
    WebAuthn,
    /// Push approval.
    Push,
}

impl MfaChallengeType {
    /// Convert to the wire string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Totp => "totp",
            Self::EmailOtp => "email_otp",
            Self::SmsOtp => "sms_otp",
            Self::WebAuthn => "webauthn",
            Self::Push => "push",
        }
    }

    /// Parse from the wire string representation. Unknown tags are rejected.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "totp" => Some(Self::Totp),
            "email_otp" => Some(Self::EmailOtp),
            "sms_otp" => Some(Self::SmsOtp),
            "webauthn" => Some(Self::WebAuthn),
            "push" => Some(Self::Push),
            _ => None,
        }
    }
}

impl fmt::Display for MfaChallengeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A channel-specific delivery address.
///
/// Validated against its channel at construction: email addresses must carry
/// an `@`, SMS numbers must be digits with an optional leading `+`, and every
/// channel rejects an empty address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Destination(String);

impl Destination {
    /// Validate and wrap an address for the given channel.
    pub fn new(channel: ChallengeChannel, address: impl Into<String>) -> crate::Result<Self> {
        let address = address.into();
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(AuthDomainError::Validation {
                field: "destination",
                message: format!("{channel} destination must not be empty"),
            });
        }
        match channel {
            ChallengeChannel::Email => {
                if !trimmed.contains('@') {
                    return Err(AuthDomainError::Validation {
                        field: "destination",
                        message: "email destination must contain '@'".to_string(),
                    });
                }
            }
            ChallengeChannel::Sms => {
                let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
                if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                    return Err(AuthDomainError::Validation {
                        field: "destination",
                        message: "sms destination must be a phone number".to_string(),
                    });
                }
            }
            ChallengeChannel::AuthenticatorApp | ChallengeChannel::Push => {}
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The validated address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque shared secret for a passwordless challenge.
///
/// Comparison happens only through [`ChallengeSecret::matches`], which hashes
/// both sides with SHA-256 and compares the digests with `subtle`, so the
/// comparison time does not depend on where the first differing byte sits or
/// on the input length. The secret is never serialized, its `Debug`
/// output is redacted, and it deliberately implements no `PartialEq` —
/// [`ChallengeSecret::matches`] is the only comparison path.
#[derive(Clone)]
pub struct ChallengeSecret(String);

impl ChallengeSecret {
    /// Wrap a secret value. Empty secrets are rejected.
    pub fn new(value: impl Into<String>) -> crate::Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(AuthDomainError::Validation {
                field: "secret",
                message: "secret must not be empty".to_string(),
            });
        }
        Ok(Self(value))
    }

    /// Constant-time comparison against a caller-supplied input.
    ///
    /// Returns `false` for inputs of a different length without leaking how
    /// much of a prefix matched.
    #[must_use]
    pub fn matches(&self, input: &str) -> bool {
        let stored = Sha256::digest(self.0.as_bytes());
        let provided = Sha256::digest(input.as_bytes());
        stored.ct_eq(&provided).into()
    }

    /// Expose the raw secret for out-of-band delivery.
    ///
    /// Only the delivery port should need this; it must never end up in an
    /// event payload or projection.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ChallengeSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChallengeSecret(<redacted>)")
    }
}

/// Generate a 6-digit numeric challenge code.
///
/// SECURITY: Uses `OsRng` directly from the operating system's CSPRNG.
#[must_use]
pub fn generate_numeric_code() -> String {
    use rand::rngs::OsRng;
    use rand::Rng;
    let code = OsRng.gen_range(0..1_000_000);
    format!("{code:06}")
}
