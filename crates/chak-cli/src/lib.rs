//! chak - command-line front end for ChakChat end-to-end encryption
//!
//! This crate provides a command-line interface for:
//! - Generating Curve25519 key pairs
//! - Sealing and opening per-message envelopes
//! - Deriving shared secrets and conversation keys
//! - Symmetric encryption under a derived key
//! - Signing and verifying envelopes as their sender

pub mod cli;
pub mod config;
pub mod output;

pub use cli::Cli;
pub use config::{CliOverrides, Config};
pub use output::{JsonResponse, OutputFormat, OutputFormatter};

use chak_crypto::CryptoError;

/// Exit codes for CLI operations
///
/// Exit codes provide machine-readable status for scripting:
/// - 0: Success - operation completed successfully
/// - 1: General error - unspecified error occurred
/// - 2: Authentication failed - ciphertext or sender signature rejected
/// - 5: Invalid input - bad arguments, key text or envelope
/// - 6: Randomness failure - the system entropy source failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully (exit code 0)
    Success = 0,
    /// General error (exit code 1)
    GeneralError = 1,
    /// Authentication failed (exit code 2)
    AuthenticationFailed = 2,
    /// Invalid input provided (exit code 5)
    InvalidInput = 5,
    /// Secure randomness unavailable (exit code 6)
    RandomnessFailure = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<&CryptoError> for ExitCode {
    fn from(err: &CryptoError) -> Self {
        match err {
            CryptoError::Authentication | CryptoError::Signature => ExitCode::AuthenticationFailed,
            CryptoError::Input(_) | CryptoError::Decode { .. } | CryptoError::InvalidLength { .. } => {
                ExitCode::InvalidInput
            }
            CryptoError::Randomness(_) => ExitCode::RandomnessFailure,
            CryptoError::KeyDerivation => ExitCode::GeneralError,
        }
    }
}

impl ExitCode {
    /// Convert to process exit code
    pub fn to_exit_code(self) -> std::process::ExitCode {
        std::process::ExitCode::from(self as u8)
    }

    /// Get the exit code name as a string
    pub fn name(&self) -> &'static str {
        match self {
            ExitCode::Success => "SUCCESS",
            ExitCode::GeneralError => "GENERAL_ERROR",
            ExitCode::AuthenticationFailed => "AUTH_FAILED",
            ExitCode::InvalidInput => "INVALID_INPUT",
            ExitCode::RandomnessFailure => "RANDOMNESS_FAILURE",
        }
    }

    /// Get a human-readable description of the exit code
    pub fn description(&self) -> &'static str {
        match self {
            ExitCode::Success => "Operation completed successfully",
            ExitCode::GeneralError => "An unspecified error occurred",
            ExitCode::AuthenticationFailed => "Ciphertext or signature failed authentication",
            ExitCode::InvalidInput => "Invalid arguments or data provided",
            ExitCode::RandomnessFailure => "Secure random source unavailable",
        }
    }
}
