//! X25519 key agreement and key derivation.
//!
//! [`derive_shared_secret`] is the bare scalar multiplication. It is not a
//! cipher key: both [`derive_symmetric_key`] and the message envelope pass the
//! shared secret through HKDF-SHA256 before any AEAD sees it.

use hkdf::Hkdf;
use sha2::Sha256;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};
use crate::keys::{public_key_for, PrivateKeyBytes, PublicKeyBytes};
use crate::KEY_SIZE;

/// Raw X25519 output (32 bytes).
pub type SharedSecret = [u8; KEY_SIZE];

/// A 32-byte AEAD key.
pub type SymmetricKey = [u8; KEY_SIZE];

const SYMMETRIC_KEY_INFO: &[u8] = b"chakchat/e2e/v1/symmetric-key";
const MESSAGE_KEY_INFO: &[u8] = b"chakchat/e2e/v1/message-key";

/// Compute the X25519 shared secret between `private_key` and `public_key`.
///
/// Commutative: `derive_shared_secret(a.private, b.public)` equals
/// `derive_shared_secret(b.private, a.public)`.
pub fn derive_shared_secret(
    private_key: &PrivateKeyBytes,
    public_key: &PublicKeyBytes,
) -> SharedSecret {
    diffie_hellman(private_key, public_key).0
}

/// Derive a symmetric key for two parties via HKDF-SHA256 over their X25519
/// shared secret.
///
/// The salt is both public keys in ascending byte order, so either side
/// computes the same key.
pub fn derive_symmetric_key(
    private_key: &PrivateKeyBytes,
    public_key: &PublicKeyBytes,
) -> CryptoResult<SymmetricKey> {
    let shared = Zeroizing::new(derive_shared_secret(private_key, public_key));
    let own_public = public_key_for(private_key);

    let (low, high) = if own_public <= *public_key {
        (&own_public, public_key)
    } else {
        (public_key, &own_public)
    };
    let mut salt = [0u8; 2 * KEY_SIZE];
    salt[..KEY_SIZE].copy_from_slice(low);
    salt[KEY_SIZE..].copy_from_slice(high);

    let key = hkdf_expand(&salt, &shared[..], SYMMETRIC_KEY_INFO)?;
    Ok(*key)
}

/// Scalar multiplication plus the contributory flag.
///
/// The flag is false when `public_key` is a low-order point and the result is
/// all zeros.
pub(crate) fn diffie_hellman(
    private_key: &PrivateKeyBytes,
    public_key: &PublicKeyBytes,
) -> (SharedSecret, bool) {
    let secret = StaticSecret::from(*private_key);
    let shared = secret.diffie_hellman(&X25519PublicKey::from(*public_key));
    let contributory = shared.was_contributory();
    (shared.to_bytes(), contributory)
}

/// AEAD key for one envelope, bound to both public keys of the exchange.
pub(crate) fn message_key(
    shared: &SharedSecret,
    ephemeral_public: &PublicKeyBytes,
    recipient_public: &PublicKeyBytes,
) -> CryptoResult<Zeroizing<SymmetricKey>> {
    let mut salt = [0u8; 2 * KEY_SIZE];
    salt[..KEY_SIZE].copy_from_slice(ephemeral_public);
    salt[KEY_SIZE..].copy_from_slice(recipient_public);
    hkdf_expand(&salt, shared, MESSAGE_KEY_INFO)
}

fn hkdf_expand(salt: &[u8], ikm: &[u8], info: &[u8]) -> CryptoResult<Zeroizing<SymmetricKey>> {
    let hk = Hkdf::<Sha256>::new(Some(salt), ikm);
    let mut okm = Zeroizing::new([0u8; KEY_SIZE]);
    hk.expand(info, &mut okm[..])
        .map_err(|_| CryptoError::KeyDerivation)?;
    Ok(okm)
}
