//! Shared-secret gate for mutating requests.
//!
//! The server holds one [`ApiToken`] for its whole lifetime, either supplied
//! by the operator or generated at startup. Save and append requests must
//! present the same string; fetch and the editor page are open.
//!
//! # Security model
//!
//! - Generated tokens are URL-safe base64 of the fully random bytes of
//!   UUID v4 values (OS CSPRNG). The version and variant bytes are skipped.
//! - The comparison is exact byte equality, evaluated with
//!   `subtle::ConstantTimeEq` so response timing does not leak a prefix.
//! - No hashing, expiry, or rotation. The editor page embeds the token so the
//!   browser can authenticate its own save calls.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use subtle::ConstantTimeEq;

use crate::error::{AuthError, TokenError};

/// Length of a token generated when the operator supplies none.
pub const DEFAULT_TOKEN_LENGTH: usize = 32;

/// The configured API token.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wrap an operator-supplied token.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generate a random URL-safe token of exactly `length` characters.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidLength`] when `length` is zero.
    pub fn generate(length: usize) -> Result<Self, TokenError> {
        if length == 0 {
            return Err(TokenError::InvalidLength { length });
        }

        // Every 3 random bytes encode to 4 characters.
        let mut encoded = URL_SAFE_NO_PAD.encode(random_bytes(length.div_ceil(4) * 3));
        encoded.truncate(length);
        Ok(Self(encoded))
    }

    /// The plaintext token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check a presented credential against this token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredential`] when nothing was presented
    /// and [`AuthError::InvalidCredential`] when the value does not match.
    pub fn verify(&self, presented: Option<&str>) -> Result<(), AuthError> {
        authorize(self, presented)
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ApiToken").field(&"[redacted]").finish()
    }
}

/// `count` random bytes drawn from UUID v4 values.
///
/// Byte 6 carries the version nibble and byte 8 the variant bits, so only
/// bytes 0..6 and 9..16 of each UUID are used.
fn random_bytes(count: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(count + 13);
    while bytes.len() < count {
        let uuid = uuid::Uuid::new_v4();
        let raw = uuid.as_bytes();
        bytes.extend_from_slice(&raw[..6]);
        bytes.extend_from_slice(&raw[9..]);
    }
    bytes.truncate(count);
    bytes
}

/// Decide whether a mutating request may proceed.
///
/// Pure function: no I/O, no state beyond `expected`.
///
/// # Errors
///
/// See [`ApiToken::verify`].
pub fn authorize(expected: &ApiToken, presented: Option<&str>) -> Result<(), AuthError> {
    let Some(presented) = presented else {
        return Err(AuthError::MissingCredential);
    };

    if bool::from(expected.0.as_bytes().ct_eq(presented.as_bytes())) {
        Ok(())
    } else {
        Err(AuthError::InvalidCredential)
    }
}
