#![forbid(unsafe_code)]

//! ChakChat end-to-end encryption core.
//!
//! Stateless primitives composed from key material to wire-ready envelope:
//! - Curve25519 key pair generation
//! - base64 transport encoding for keys and nonces
//! - X25519 shared-secret derivation (raw and HKDF-hardened)
//! - per-message public-key encryption with one-time ephemeral keys
//! - symmetric authenticated encryption under a caller-supplied key
//! - opt-in Ed25519 sender signatures over envelopes
//!
//! Every operation takes its key and nonce material as explicit arguments and
//! returns results by value. Operations that consume randomness have a
//! `*_with` variant accepting any [`rand_core::CryptoRng`] source.

pub mod codec;
pub mod config;
pub mod envelope;
pub mod error;
pub mod exchange;
pub mod keys;
pub mod rng;
pub mod service;
pub mod signing;
pub mod symmetric;

#[cfg(test)]
mod proptests;

pub use codec::{
    decode_key, decode_nonce, decode_signature, encode_key, encode_nonce, encode_signature,
};
pub use config::{ConfigError, EncryptionConfig};
pub use envelope::{decrypt_message, encrypt_message, encrypt_message_with, EncryptedEnvelope};
pub use error::{CryptoError, CryptoResult};
pub use exchange::{derive_shared_secret, derive_symmetric_key};
pub use keys::{generate_key_pair, generate_key_pair_with, KeyPair};
pub use service::{EncodedKeyPair, EncryptionService};
pub use signing::{
    generate_signing_key_pair, generate_signing_key_pair_with, sign_envelope, verify_envelope,
    SigningKeyPair,
};
pub use symmetric::{decrypt_symmetric, encrypt_symmetric, encrypt_symmetric_with};

/// Size of a Curve25519 key and of a symmetric key, in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of the extended AEAD nonce, in bytes.
pub const NONCE_SIZE: usize = 24;

/// Size of the Poly1305 authentication tag appended to every ciphertext.
pub const TAG_SIZE: usize = 16;

/// Largest plaintext accepted by the message and symmetric encryptors: 100 MiB.
pub const MAX_MESSAGE_SIZE: usize = 100 * 1024 * 1024;
