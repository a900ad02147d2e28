//! Per-message public-key encryption.
//!
//! Each envelope is sealed with a fresh ephemeral X25519 key pair and a fresh
//! 24-byte nonce. The AEAD key is HKDF-SHA256 over the ephemeral/recipient
//! shared secret, salted with both public keys. The envelope carries the
//! ciphertext, the nonce and the ephemeral public key; the ephemeral private
//! key is zeroized as soon as the ciphertext exists.
//!
//! Envelopes are anonymous: nothing in them authenticates the sender.

use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::codec::{decode_bytes, decode_fixed, encode_bytes, encode_key, encode_nonce};
use crate::error::{CryptoError, CryptoResult};
use crate::exchange::{diffie_hellman, message_key};
use crate::keys::{generate_key_pair_with, public_key_for, PrivateKeyBytes, PublicKeyBytes};
use crate::rng::{random_array, SystemRng};
use crate::symmetric::{check_plaintext, open_with_nonce, seal_with_nonce};
use crate::{MAX_MESSAGE_SIZE, NONCE_SIZE};

/// Transport form of an encrypted message.
///
/// Exactly three base64 text fields: `ciphertext`, `nonce` and `ephemeral`.
/// None of them is secret and all three are required to decrypt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncryptedEnvelope {
    /// Sealed plaintext with the 16-byte tag appended.
    pub ciphertext: String,
    /// 24-byte AEAD nonce.
    pub nonce: String,
    /// 32-byte ephemeral X25519 public key.
    #[serde(rename = "ephemeral")]
    pub ephemeral_public_key: String,
}

/// Encrypt `plaintext` for the holder of `recipient_public_key`.
pub fn encrypt_message(
    plaintext: &str,
    recipient_public_key: &PublicKeyBytes,
) -> CryptoResult<EncryptedEnvelope> {
    encrypt_message_with(&mut SystemRng, plaintext, recipient_public_key)
}

/// Encrypt `plaintext` drawing the ephemeral key and nonce from `rng`.
pub fn encrypt_message_with<R>(
    rng: &mut R,
    plaintext: &str,
    recipient_public_key: &PublicKeyBytes,
) -> CryptoResult<EncryptedEnvelope>
where
    R: RngCore + CryptoRng + ?Sized,
{
    seal_message(rng, plaintext.as_bytes(), recipient_public_key, MAX_MESSAGE_SIZE)
}

/// Decrypt an envelope with the recipient's private key.
///
/// Fails closed: on a tag mismatch the result is
/// [`CryptoError::Authentication`] and no plaintext is returned.
pub fn decrypt_message(
    envelope: &EncryptedEnvelope,
    recipient_private_key: &PrivateKeyBytes,
) -> CryptoResult<String> {
    let plaintext = open_message(envelope, recipient_private_key)?;
    String::from_utf8(plaintext)
        .map_err(|_| CryptoError::input("decrypted payload is not valid UTF-8"))
}

pub(crate) fn seal_message<R>(
    rng: &mut R,
    plaintext: &[u8],
    recipient_public_key: &PublicKeyBytes,
    max_len: usize,
) -> CryptoResult<EncryptedEnvelope>
where
    R: RngCore + CryptoRng + ?Sized,
{
    check_plaintext(plaintext, max_len)?;

    let ephemeral = generate_key_pair_with(rng)?;
    let nonce: [u8; NONCE_SIZE] = random_array(rng)?;

    let (shared, contributory) = diffie_hellman(ephemeral.private_key(), recipient_public_key);
    let shared = Zeroizing::new(shared);
    if !contributory {
        return Err(CryptoError::input(
            "recipient public key is a low-order point",
        ));
    }

    let key = message_key(&shared, ephemeral.public_key(), recipient_public_key)?;
    let ciphertext = seal_with_nonce(&key, &nonce, plaintext)?;

    Ok(EncryptedEnvelope {
        ciphertext: encode_bytes(&ciphertext),
        nonce: encode_nonce(&nonce),
        ephemeral_public_key: encode_key(ephemeral.public_key()),
    })
}

pub(crate) fn open_message(
    envelope: &EncryptedEnvelope,
    recipient_private_key: &PrivateKeyBytes,
) -> CryptoResult<Vec<u8>> {
    let ciphertext = decode_bytes("ciphertext", &envelope.ciphertext)?;
    let nonce: [u8; NONCE_SIZE] = decode_fixed("nonce", &envelope.nonce)?;
    let ephemeral: PublicKeyBytes = decode_fixed("ephemeral", &envelope.ephemeral_public_key)?;

    let recipient_public = public_key_for(recipient_private_key);
    let (shared, contributory) = diffie_hellman(recipient_private_key, &ephemeral);
    let shared = Zeroizing::new(shared);
    if !contributory {
        return Err(CryptoError::Authentication);
    }

    let key = message_key(&shared, &ephemeral, &recipient_public)?;
    open_with_nonce(&key, &nonce, &ciphertext)
}
