//! Text-keyed facade over the encryption core.
//!
//! [`EncryptionService`] is what account and transport services call: keys go
//! in and come out as base64 transport text. The service holds configuration
//! only, so it is cheap to clone and safe to share between threads; it keeps
//! no key material between calls.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::codec::{decode_key, decode_signature, encode_key, encode_signature};
use crate::config::{ConfigError, EncryptionConfig};
use crate::envelope::{open_message, seal_message, EncryptedEnvelope};
use crate::error::{CryptoError, CryptoResult};
use crate::exchange;
use crate::keys::generate_key_pair;
use crate::rng::SystemRng;
use crate::signing::{self, SigningKeyPair};
use crate::symmetric::{open_symmetric, seal_symmetric};

/// A key pair in transport encoding.
#[derive(Clone, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct EncodedKeyPair {
    /// base64 public key, safe to publish
    pub public_key: String,
    /// base64 private key, for the holder's trusted storage only
    pub private_key: String,
}

impl fmt::Debug for EncodedKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedKeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Stateless encryption service configured by [`EncryptionConfig`].
#[derive(Debug, Clone, Default)]
pub struct EncryptionService {
    config: EncryptionConfig,
}

impl EncryptionService {
    /// Create a service after validating `config`.
    pub fn new(config: EncryptionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &EncryptionConfig {
        &self.config
    }

    /// Generate an identity key pair for a user.
    pub fn generate_user_key_pair(&self) -> CryptoResult<EncodedKeyPair> {
        let kp = report("generate_key_pair", generate_key_pair())?;
        debug!("generated key pair");
        Ok(EncodedKeyPair {
            public_key: encode_key(kp.public_key()),
            private_key: encode_key(kp.private_key()),
        })
    }

    /// Encrypt a message for the holder of `recipient_public_key`.
    pub fn encrypt_message(
        &self,
        message: &str,
        recipient_public_key: &str,
    ) -> CryptoResult<EncryptedEnvelope> {
        let result = decode_key(recipient_public_key).and_then(|recipient| {
            seal_message(
                &mut SystemRng,
                message.as_bytes(),
                &recipient,
                self.config.max_message_size,
            )
        });
        let envelope = report("encrypt_message", result)?;
        debug!(plaintext_len = message.len(), "message sealed");
        Ok(envelope)
    }

    /// Decrypt an envelope with the user's private key.
    pub fn decrypt_message(
        &self,
        envelope: &EncryptedEnvelope,
        private_key: &str,
    ) -> CryptoResult<String> {
        let result = decode_secret(private_key)
            .and_then(|private| open_message(envelope, &private))
            .and_then(into_text);
        let plaintext = report("decrypt_message", result)?;
        debug!(plaintext_len = plaintext.len(), "message opened");
        Ok(plaintext)
    }

    /// Raw X25519 shared secret between the user and a peer, base64 encoded.
    ///
    /// Prefer [`derive_symmetric_key`](Self::derive_symmetric_key) when the
    /// result will be used as a cipher key.
    pub fn derive_shared_secret(&self, private_key: &str, public_key: &str) -> CryptoResult<String> {
        let result = decode_secret(private_key).and_then(|private| {
            let public = decode_key(public_key)?;
            let shared = zeroize::Zeroizing::new(exchange::derive_shared_secret(&private, &public));
            Ok(encode_key(&shared))
        });
        report("derive_shared_secret", result)
    }

    /// HKDF-derived symmetric key shared by the user and a peer, base64 encoded.
    pub fn derive_symmetric_key(&self, private_key: &str, public_key: &str) -> CryptoResult<String> {
        let result = decode_secret(private_key).and_then(|private| {
            let public = decode_key(public_key)?;
            let key = zeroize::Zeroizing::new(exchange::derive_symmetric_key(&private, &public)?);
            Ok(encode_key(&key))
        });
        report("derive_symmetric_key", result)
    }

    /// Encrypt `plaintext` under a base64 symmetric key.
    pub fn encrypt_symmetric(&self, plaintext: &str, key: &str) -> CryptoResult<String> {
        let result = decode_secret(key).and_then(|key| {
            seal_symmetric(
                &mut SystemRng,
                plaintext.as_bytes(),
                &key,
                self.config.max_message_size,
            )
        });
        report("encrypt_symmetric", result)
    }

    /// Decrypt symmetric cipher text under a base64 symmetric key.
    pub fn decrypt_symmetric(&self, cipher_text: &str, key: &str) -> CryptoResult<String> {
        let result = decode_secret(key)
            .and_then(|key| open_symmetric(cipher_text, &key))
            .and_then(into_text);
        report("decrypt_symmetric", result)
    }

    /// Generate an Ed25519 sender identity. `public_key` is the verifying key
    /// and `private_key` the signing seed.
    pub fn generate_signing_key_pair(&self) -> CryptoResult<EncodedKeyPair> {
        let kp = report("generate_signing_key_pair", signing::generate_signing_key_pair())?;
        debug!("generated signing key pair");
        Ok(EncodedKeyPair {
            public_key: encode_key(&kp.verifying_key()),
            private_key: encode_key(kp.seed()),
        })
    }

    /// Sign `envelope` with a base64 signing seed; returns the base64 signature.
    pub fn sign_envelope(
        &self,
        envelope: &EncryptedEnvelope,
        signing_key: &str,
    ) -> CryptoResult<String> {
        let result = decode_secret(signing_key).and_then(|seed| {
            let signer = SigningKeyPair::from_seed(&seed);
            signing::sign_envelope(&signer, envelope)
        });
        report("sign_envelope", result).map(|sig| encode_signature(&sig))
    }

    /// Check a base64 sender signature over `envelope`.
    pub fn verify_envelope(
        &self,
        envelope: &EncryptedEnvelope,
        verifying_key: &str,
        signature: &str,
    ) -> CryptoResult<()> {
        let result = decode_key(verifying_key).and_then(|key| {
            let sig = decode_signature(signature)?;
            signing::verify_envelope(&key, envelope, &sig)
        });
        report("verify_envelope", result)?;
        debug!("sender signature verified");
        Ok(())
    }
}

fn decode_secret(text: &str) -> CryptoResult<zeroize::Zeroizing<[u8; 32]>> {
    decode_key(text).map(zeroize::Zeroizing::new)
}

fn into_text(bytes: Vec<u8>) -> CryptoResult<String> {
    String::from_utf8(bytes).map_err(|_| CryptoError::input("decrypted payload is not valid UTF-8"))
}

/// Log a failed operation without its inputs and hand the result back.
fn report<T>(operation: &'static str, result: CryptoResult<T>) -> CryptoResult<T> {
    if let Err(err) = &result {
        match err {
            CryptoError::Authentication => {
                warn!(operation, "authentication failed; ciphertext rejected");
            }
            CryptoError::Signature => {
                warn!(operation, "sender signature rejected");
            }
            CryptoError::Decode { field, .. } | CryptoError::InvalidLength { field, .. } => {
                debug!(operation, field, error = %err, "malformed transport text");
            }
            _ => debug!(operation, error = %err, "operation failed"),
        }
    }
    result
}
