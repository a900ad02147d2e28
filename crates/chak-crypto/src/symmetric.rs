//! Symmetric authenticated encryption under a caller-supplied 32-byte key.
//!
//! Wire format: base64( nonce(24) || ciphertext+tag ). The nonce travels in
//! front of the ciphertext so the text needs no side-channel metadata.
//!
//! The cipher is XChaCha20-Poly1305, so these blobs are not NaCl `secretbox`
//! compatible and cannot be opened by XSalsa20 producers or consumers.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    Key, XChaCha20Poly1305, XNonce,
};
use rand_core::{CryptoRng, RngCore};

use crate::codec::{decode_bytes, encode_bytes};
use crate::error::{CryptoError, CryptoResult};
use crate::exchange::SymmetricKey;
use crate::rng::{random_array, SystemRng};
use crate::{MAX_MESSAGE_SIZE, NONCE_SIZE};

/// Encrypt `plaintext` under `key` with a fresh random nonce.
pub fn encrypt_symmetric(plaintext: &str, key: &SymmetricKey) -> CryptoResult<String> {
    encrypt_symmetric_with(&mut SystemRng, plaintext, key)
}

/// Encrypt `plaintext` under `key`, drawing the nonce from `rng`.
pub fn encrypt_symmetric_with<R>(
    rng: &mut R,
    plaintext: &str,
    key: &SymmetricKey,
) -> CryptoResult<String>
where
    R: RngCore + CryptoRng + ?Sized,
{
    seal_symmetric(rng, plaintext.as_bytes(), key, MAX_MESSAGE_SIZE)
}

/// Decrypt text produced by [`encrypt_symmetric`].
///
/// Decoded input shorter than a nonce is an [`CryptoError::Input`]; a tag
/// mismatch is [`CryptoError::Authentication`].
pub fn decrypt_symmetric(cipher_text: &str, key: &SymmetricKey) -> CryptoResult<String> {
    let plaintext = open_symmetric(cipher_text, key)?;
    String::from_utf8(plaintext)
        .map_err(|_| CryptoError::input("decrypted payload is not valid UTF-8"))
}

pub(crate) fn seal_symmetric<R>(
    rng: &mut R,
    plaintext: &[u8],
    key: &SymmetricKey,
    max_len: usize,
) -> CryptoResult<String>
where
    R: RngCore + CryptoRng + ?Sized,
{
    check_plaintext(plaintext, max_len)?;

    let nonce: [u8; NONCE_SIZE] = random_array(rng)?;
    let ct = seal_with_nonce(key, &nonce, plaintext)?;

    let mut out = Vec::with_capacity(NONCE_SIZE + ct.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ct);
    Ok(encode_bytes(&out))
}

pub(crate) fn open_symmetric(cipher_text: &str, key: &SymmetricKey) -> CryptoResult<Vec<u8>> {
    let blob = decode_bytes("symmetric ciphertext", cipher_text)?;
    if blob.len() < NONCE_SIZE {
        return Err(CryptoError::input(format!(
            "ciphertext too short: {} bytes, need at least {NONCE_SIZE}",
            blob.len()
        )));
    }
    let (nonce, ct) = blob.split_at(NONCE_SIZE);
    let nonce: &[u8; NONCE_SIZE] = nonce
        .try_into()
        .map_err(|_| CryptoError::input("ciphertext too short"))?;
    open_with_nonce(key, nonce, ct)
}

/// Reject empty or oversized plaintexts before any entropy is spent.
pub(crate) fn check_plaintext(plaintext: &[u8], max_len: usize) -> CryptoResult<()> {
    if plaintext.is_empty() {
        return Err(CryptoError::input("plaintext cannot be empty"));
    }
    if plaintext.len() > max_len {
        return Err(CryptoError::input(format!(
            "plaintext of {} bytes exceeds the {max_len}-byte limit",
            plaintext.len()
        )));
    }
    Ok(())
}

/// XChaCha20-Poly1305 seal; output is ciphertext || tag(16).
pub(crate) fn seal_with_nonce(
    key: &SymmetricKey,
    nonce: &[u8; NONCE_SIZE],
    plaintext: &[u8],
) -> CryptoResult<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .encrypt(XNonce::from_slice(nonce), plaintext)
        .map_err(|_| CryptoError::input("plaintext exceeds cipher limits"))
}

/// XChaCha20-Poly1305 open. Verifies the tag before releasing any bytes.
pub(crate) fn open_with_nonce(
    key: &SymmetricKey,
    nonce: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
) -> CryptoResult<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Authentication)
}
