//! Crypto error types.

use thiserror::Error;

/// Result type for encryption-core operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors surfaced by the encryption core.
///
/// Every variant is distinguishable by the caller; nothing is logged and
/// swallowed inside the primitives. None of the variants carry key material
/// or plaintext.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Caller-supplied plaintext or ciphertext violates a precondition.
    #[error("invalid input: {0}")]
    Input(String),

    /// Transport text is not valid base64.
    #[error("invalid base64 in {field}: {source}")]
    Decode {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    /// Decoded bytes do not have the fixed length required for the field.
    #[error("invalid {field} length: expected {expected}, got {got}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    /// AEAD tag verification failed; no plaintext is produced.
    #[error("authentication failed: ciphertext rejected")]
    Authentication,

    /// Sender signature missing its key, malformed, or not matching the envelope.
    #[error("sender signature verification failed")]
    Signature,

    /// The secure random source failed.
    #[error("secure random source failed: {0}")]
    Randomness(String),

    /// HKDF refused the requested output length.
    #[error("key derivation failed")]
    KeyDerivation,
}

impl CryptoError {
    pub(crate) fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    /// Whether the error signals possible tampering or a wrong key.
    pub fn is_security_event(&self) -> bool {
        matches!(self, Self::Authentication | Self::Signature)
    }

    /// Whether the error means the input text itself was malformed.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::Input(_) | Self::Decode { .. } | Self::InvalidLength { .. }
        )
    }
}
