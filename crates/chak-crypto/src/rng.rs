//! Secure randomness plumbing.
//!
//! All entropy flows through [`fill_random`] so a failing source becomes a
//! [`CryptoError::Randomness`] instead of a panic. There is no fallback to a
//! weaker generator.

use rand_core::{CryptoRng, RngCore};

use crate::error::{CryptoError, CryptoResult};

/// The system CSPRNG used when no generator is injected.
pub use rand_core::OsRng as SystemRng;

/// Fill `buf` from `rng`, surfacing source failures.
pub fn fill_random<R>(rng: &mut R, buf: &mut [u8]) -> CryptoResult<()>
where
    R: RngCore + CryptoRng + ?Sized,
{
    rng.try_fill_bytes(buf)
        .map_err(|e| CryptoError::Randomness(e.to_string()))
}

/// Draw a fixed-size random array from `rng`.
pub fn random_array<const N: usize, R>(rng: &mut R) -> CryptoResult<[u8; N]>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut out = [0u8; N];
    fill_random(rng, &mut out)?;
    Ok(out)
}
