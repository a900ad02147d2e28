//! Long-lived Curve25519 key pairs.
//!
//! The private half is zeroized when the [`KeyPair`] is dropped and is
//! redacted from `Debug` output.

use std::fmt;

use constant_time_eq::constant_time_eq_32;
use rand_core::{CryptoRng, RngCore};
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoResult;
use crate::rng::{random_array, SystemRng};
use crate::KEY_SIZE;

/// A Curve25519 public key (32 bytes).
pub type PublicKeyBytes = [u8; KEY_SIZE];

/// A Curve25519 private key (32 bytes).
pub type PrivateKeyBytes = [u8; KEY_SIZE];

/// A Curve25519 key pair for ECDH.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    public: PublicKeyBytes,
    private: PrivateKeyBytes,
}

impl KeyPair {
    /// Rebuild a key pair from its private half.
    pub fn from_private_key(private: PrivateKeyBytes) -> Self {
        let public = public_key_for(&private);
        Self { public, private }
    }

    /// The distributable public half.
    pub fn public_key(&self) -> &PublicKeyBytes {
        &self.public
    }

    /// The private half. Keep it inside trusted storage; never log it.
    pub fn private_key(&self) -> &PrivateKeyBytes {
        &self.private
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq_32(&self.private, &other.private)
            && constant_time_eq_32(&self.public, &other.public)
    }
}

impl Eq for KeyPair {}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("private", &"[REDACTED]")
            .finish()
    }
}

/// Compute the public key belonging to `private`.
pub fn public_key_for(private: &PrivateKeyBytes) -> PublicKeyBytes {
    let secret = StaticSecret::from(*private);
    X25519PublicKey::from(&secret).to_bytes()
}

/// Generate a key pair from the system CSPRNG.
pub fn generate_key_pair() -> CryptoResult<KeyPair> {
    generate_key_pair_with(&mut SystemRng)
}

/// Generate a key pair from `rng`.
///
/// Fails with [`CryptoError::Randomness`](crate::CryptoError::Randomness)
/// when the source cannot deliver; the failure is not retried.
pub fn generate_key_pair_with<R>(rng: &mut R) -> CryptoResult<KeyPair>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let private: PrivateKeyBytes = random_array(rng)?;
    Ok(KeyPair::from_private_key(private))
}
