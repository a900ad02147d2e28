//! Transport text encoding for fixed-size key and nonce material.
//!
//! Keys travel as standard-alphabet, padded base64. Decoding checks the
//! alphabet first ([`CryptoError::Decode`]) and the decoded length second
//! ([`CryptoError::InvalidLength`]).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{CryptoError, CryptoResult};
use crate::signing::SIGNATURE_SIZE;
use crate::{KEY_SIZE, NONCE_SIZE};

/// Encode a 32-byte key as transport text.
pub fn encode_key(key: &[u8; KEY_SIZE]) -> String {
    STANDARD.encode(key)
}

/// Decode transport text into a 32-byte key.
pub fn decode_key(text: &str) -> CryptoResult<[u8; KEY_SIZE]> {
    decode_fixed("key", text)
}

/// Encode a 24-byte nonce as transport text.
pub fn encode_nonce(nonce: &[u8; NONCE_SIZE]) -> String {
    STANDARD.encode(nonce)
}

/// Decode transport text into a 24-byte nonce.
pub fn decode_nonce(text: &str) -> CryptoResult<[u8; NONCE_SIZE]> {
    decode_fixed("nonce", text)
}

/// Encode a 64-byte sender signature as transport text.
pub fn encode_signature(signature: &[u8; SIGNATURE_SIZE]) -> String {
    STANDARD.encode(signature)
}

/// Decode transport text into a 64-byte sender signature.
pub fn decode_signature(text: &str) -> CryptoResult<[u8; SIGNATURE_SIZE]> {
    decode_fixed("signature", text)
}

/// Encode variable-length bytes (ciphertexts) as transport text.
pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode variable-length transport text; `field` names the source in errors.
pub fn decode_bytes(field: &'static str, text: &str) -> CryptoResult<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|source| CryptoError::Decode { field, source })
}

/// Decode transport text that must hold exactly `N` bytes.
pub fn decode_fixed<const N: usize>(field: &'static str, text: &str) -> CryptoResult<[u8; N]> {
    let bytes = decode_bytes(field, text)?;
    let got = bytes.len();
    bytes.try_into().map_err(|_| CryptoError::InvalidLength {
        field,
        expected: N,
        got,
    })
}
