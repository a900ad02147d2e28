//! Opt-in sender signatures over envelopes.
//!
//! Envelopes are anonymous. A sender that wants to be authenticated signs the
//! decoded `ciphertext || nonce || ephemeral` bytes with a long-lived Ed25519
//! key and ships the 64-byte signature beside the envelope; the envelope's
//! three-field wire form does not change. Verification uses strict Ed25519
//! rules (no malleable signatures, no small-order keys).

use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand_core::{CryptoRng, RngCore};

use crate::codec::{decode_bytes, decode_fixed};
use crate::envelope::EncryptedEnvelope;
use crate::error::{CryptoError, CryptoResult};
use crate::rng::{random_array, SystemRng};
use crate::{KEY_SIZE, NONCE_SIZE};

/// Size of an Ed25519 signature, in bytes.
pub const SIGNATURE_SIZE: usize = 64;

/// An Ed25519 signature (64 bytes).
pub type SignatureBytes = [u8; SIGNATURE_SIZE];

/// An Ed25519 verifying key (32 bytes).
pub type VerifyingKeyBytes = [u8; KEY_SIZE];

const SIGNATURE_CONTEXT: &[u8] = b"chakchat/e2e/v1/envelope-signature";

/// A sender's Ed25519 identity. The secret half is zeroized on drop.
#[derive(Clone)]
pub struct SigningKeyPair {
    signing: SigningKey,
}

impl SigningKeyPair {
    /// Rebuild a signing identity from its 32-byte seed.
    pub fn from_seed(seed: &[u8; KEY_SIZE]) -> Self {
        Self {
            signing: SigningKey::from_bytes(seed),
        }
    }

    /// The 32-byte seed. Keep it inside trusted storage; never log it.
    pub fn seed(&self) -> &[u8; KEY_SIZE] {
        self.signing.as_bytes()
    }

    /// The distributable verifying key.
    pub fn verifying_key(&self) -> VerifyingKeyBytes {
        self.signing.verifying_key().to_bytes()
    }
}

impl fmt::Debug for SigningKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKeyPair")
            .field("verifying_key", &self.verifying_key())
            .field("seed", &"[REDACTED]")
            .finish()
    }
}

/// Generate a signing identity from the system CSPRNG.
pub fn generate_signing_key_pair() -> CryptoResult<SigningKeyPair> {
    generate_signing_key_pair_with(&mut SystemRng)
}

/// Generate a signing identity from `rng`.
pub fn generate_signing_key_pair_with<R>(rng: &mut R) -> CryptoResult<SigningKeyPair>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let seed = zeroize::Zeroizing::new(random_array::<KEY_SIZE, R>(rng)?);
    Ok(SigningKeyPair::from_seed(&seed))
}

/// Sign `envelope` as its sender.
///
/// Fails with a decode or length error when the envelope fields are not
/// well-formed transport text.
pub fn sign_envelope(
    signer: &SigningKeyPair,
    envelope: &EncryptedEnvelope,
) -> CryptoResult<SignatureBytes> {
    let message = signed_bytes(envelope)?;
    Ok(signer.signing.sign(&message).to_bytes())
}

/// Check that `signature` was made over `envelope` by the holder of
/// `verifying_key`.
///
/// Any mismatch, including an unusable verifying key, is
/// [`CryptoError::Signature`].
pub fn verify_envelope(
    verifying_key: &VerifyingKeyBytes,
    envelope: &EncryptedEnvelope,
    signature: &SignatureBytes,
) -> CryptoResult<()> {
    let message = signed_bytes(envelope)?;
    let key = VerifyingKey::from_bytes(verifying_key).map_err(|_| CryptoError::Signature)?;
    key.verify_strict(&message, &Signature::from_bytes(signature))
        .map_err(|_| CryptoError::Signature)
}

/// Domain tag followed by the decoded envelope fields. The nonce and
/// ephemeral key have fixed sizes, so the concatenation is unambiguous.
fn signed_bytes(envelope: &EncryptedEnvelope) -> CryptoResult<Vec<u8>> {
    let ciphertext = decode_bytes("ciphertext", &envelope.ciphertext)?;
    let nonce: [u8; NONCE_SIZE] = decode_fixed("nonce", &envelope.nonce)?;
    let ephemeral: [u8; KEY_SIZE] = decode_fixed("ephemeral", &envelope.ephemeral_public_key)?;

    let mut out =
        Vec::with_capacity(SIGNATURE_CONTEXT.len() + ciphertext.len() + NONCE_SIZE + KEY_SIZE);
    out.extend_from_slice(SIGNATURE_CONTEXT);
    out.extend_from_slice(&ciphertext);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ephemeral);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_bytes, encode_key, encode_nonce};
    use crate::envelope::{decrypt_message, encrypt_message_with};
    use crate::keys::{generate_key_pair_with, KeyPair};
    use crate::rng::testing::ExhaustedRng;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    fn setup() -> (SigningKeyPair, KeyPair, EncryptedEnvelope) {
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let sender = generate_signing_key_pair_with(&mut rng).unwrap();
        let recipient = generate_key_pair_with(&mut rng).unwrap();
        let env = encrypt_message_with(&mut rng, "signed hello", recipient.public_key()).unwrap();
        (sender, recipient, env)
    }

    #[test]
    fn test_sign_and_verify() {
        let (sender, recipient, env) = setup();
        let sig = sign_envelope(&sender, &env).unwrap();

        assert!(verify_envelope(&sender.verifying_key(), &env, &sig).is_ok());
        assert_eq!(
            decrypt_message(&env, recipient.private_key()).unwrap(),
            "signed hello"
        );
    }

    #[test]
    fn test_signatures_are_deterministic() {
        let (sender, _, env) = setup();
        assert_eq!(
            sign_envelope(&sender, &env).unwrap(),
            sign_envelope(&sender, &env).unwrap()
        );
    }

    #[test]
    fn test_other_sender_rejected() {
        let (sender, _, env) = setup();
        let impostor = generate_signing_key_pair().unwrap();
        let sig = sign_envelope(&impostor, &env).unwrap();

        assert_eq!(
            verify_envelope(&sender.verifying_key(), &env, &sig),
            Err(CryptoError::Signature)
        );
    }

    #[test]
    fn test_each_field_is_covered() {
        let (sender, _, env) = setup();
        let sig = sign_envelope(&sender, &env).unwrap();
        let vk = sender.verifying_key();

        let mut ct = decode_bytes("ciphertext", &env.ciphertext).unwrap();
        ct[0] ^= 0x01;
        let mut tampered = env.clone();
        tampered.ciphertext = encode_bytes(&ct);
        assert_eq!(verify_envelope(&vk, &tampered, &sig), Err(CryptoError::Signature));

        let mut nonce: [u8; NONCE_SIZE] = decode_fixed("nonce", &env.nonce).unwrap();
        nonce[NONCE_SIZE - 1] ^= 0x80;
        let mut tampered = env.clone();
        tampered.nonce = encode_nonce(&nonce);
        assert_eq!(verify_envelope(&vk, &tampered, &sig), Err(CryptoError::Signature));

        let mut eph: [u8; KEY_SIZE] = decode_fixed("ephemeral", &env.ephemeral_public_key).unwrap();
        eph[KEY_SIZE - 1] ^= 0x80;
        let mut tampered = env.clone();
        tampered.ephemeral_public_key = encode_key(&eph);
        assert_eq!(verify_envelope(&vk, &tampered, &sig), Err(CryptoError::Signature));
    }

    #[test]
    fn test_corrupted_signature_rejected() {
        let (sender, _, env) = setup();
        let mut sig = sign_envelope(&sender, &env).unwrap();
        sig[10] ^= 0x04;

        assert_eq!(
            verify_envelope(&sender.verifying_key(), &env, &sig),
            Err(CryptoError::Signature)
        );
    }

    #[test]
    fn test_small_order_verifying_key_rejected() {
        let (sender, _, env) = setup();
        let sig = sign_envelope(&sender, &env).unwrap();
        let mut identity_point = [0u8; KEY_SIZE];
        identity_point[0] = 1;

        assert_eq!(
            verify_envelope(&identity_point, &env, &sig),
            Err(CryptoError::Signature)
        );
    }

    #[test]
    fn test_malformed_envelope_is_decode_error() {
        let (sender, _, mut env) = setup();
        env.nonce = "***".to_string();
        assert!(matches!(
            sign_envelope(&sender, &env),
            Err(CryptoError::Decode { field: "nonce", .. })
        ));
    }

    #[test]
    fn test_seed_round_trip() {
        let (sender, _, _) = setup();
        let rebuilt = SigningKeyPair::from_seed(sender.seed());
        assert_eq!(rebuilt.verifying_key(), sender.verifying_key());
    }

    #[test]
    fn test_debug_redacts_seed() {
        let (sender, _, _) = setup();
        let rendered = format!("{sender:?}");
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_exhausted_source_fails() {
        assert!(matches!(
            generate_signing_key_pair_with(&mut ExhaustedRng),
            Err(CryptoError::Randomness(_))
        ));
    }
}
