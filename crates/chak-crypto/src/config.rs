//! Encryption configuration.
//!
//! Holds tunables only; key material never lives here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::MAX_MESSAGE_SIZE;

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Tunables for [`EncryptionService`](crate::EncryptionService).
///
/// # Example TOML
///
/// ```toml
/// [encryption]
/// max_message_size = 1048576
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionConfig {
    /// Largest plaintext accepted, in bytes
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
}

fn default_max_message_size() -> usize {
    MAX_MESSAGE_SIZE
}

impl Default for EncryptionConfig {
    fn default() -> Self {
        Self {
            max_message_size: default_max_message_size(),
        }
    }
}

impl EncryptionConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_message_size == 0 {
            return Err(ConfigError::Validation(
                "max_message_size must be greater than 0".to_string(),
            ));
        }
        if self.max_message_size > MAX_MESSAGE_SIZE {
            return Err(ConfigError::Validation(format!(
                "max_message_size {} exceeds the hard limit of {MAX_MESSAGE_SIZE} bytes",
                self.max_message_size
            )));
        }
        Ok(())
    }
}
