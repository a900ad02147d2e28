//! Configuration management for chak
//!
//! Configuration is stored in TOML format. Every section is optional and
//! falls back to defaults. Key material never goes in this file.
//!
//! # Configuration File Locations
//!
//! - Linux: `~/.config/chak/chak.toml`
//! - macOS: `~/Library/Application Support/chat.chakchat.chak/chak.toml`
//! - Windows: `%APPDATA%\chakchat\chak\config\chak.toml`

use std::path::{Path, PathBuf};

use chak_crypto::EncryptionConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// Failed to parse config file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

impl From<chak_crypto::ConfigError> for ConfigError {
    fn from(err: chak_crypto::ConfigError) -> Self {
        match err {
            chak_crypto::ConfigError::Validation(msg) => ConfigError::Validation(msg),
        }
    }
}

/// CLI configuration
///
/// # Example TOML
///
/// ```toml
/// [encryption]
/// max_message_size = 104857600
///
/// [output]
/// format = "text"  # "text" | "json" | "quiet"
///
/// [logging]
/// level = "warn"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Encryption tunables
    #[serde(default)]
    pub encryption: EncryptionConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format: "text", "json", "quiet"
    #[serde(default = "default_format")]
    pub format: String,

    /// Verbose output
    #[serde(default)]
    pub verbose: bool,
}

fn default_format() -> String {
    "text".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            verbose: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location, or defaults if absent
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from custom path or default
    pub fn load_from(custom_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = custom_path {
            Self::load(path)
        } else {
            Self::load_default()
        }
    }

    /// Get default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("chat", "chakchat", "chak")
            .map(|dirs| dirs.config_dir().join("chak.toml"))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.encryption.validate()?;

        let valid_formats = ["text", "json", "quiet"];
        if !valid_formats.contains(&self.output.format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Invalid output format '{}'. Valid values: {:?}",
                self.output.format, valid_formats
            )));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Invalid log level '{}'. Valid values: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }

    /// Log filter for the resolved `[logging].level`, falling back to `warn`
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.logging.level).unwrap_or_else(|_| EnvFilter::new("warn"))
    }

    /// Generate a sample configuration file content
    pub fn sample_toml() -> &'static str {
        r#"# chak configuration

[encryption]
# Largest plaintext accepted, in bytes (at most 104857600)
max_message_size = 104857600

[output]
# Output format: "text", "json", "quiet"
format = "text"
# Enable verbose output
verbose = false

[logging]
# Log level: "error", "warn", "info", "debug", "trace"
level = "warn"
"#
    }
}

/// CLI configuration overrides
///
/// Command-line arguments take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Output format override
    pub output_format: Option<String>,
    /// Verbose flag override
    pub verbose: Option<bool>,
    /// Debug flag override
    pub debug: Option<bool>,
}

impl Config {
    /// Apply CLI overrides to configuration
    pub fn with_overrides(mut self, overrides: &CliOverrides) -> Self {
        if let Some(ref format) = overrides.output_format {
            self.output.format = format.clone();
        }
        if let Some(verbose) = overrides.verbose {
            self.output.verbose = verbose;
            if verbose && self.logging.level != "debug" && self.logging.level != "trace" {
                self.logging.level = "info".to_string();
            }
        }
        if let Some(true) = overrides.debug {
            self.logging.level = "debug".to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.encryption, EncryptionConfig::default());
        assert_eq!(config.output.format, "text");
        assert!(!config.output.verbose);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_output_format() {
        let mut config = Config::default();
        config.output.format = "table".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid output format"));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();

        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_validate_zero_message_size() {
        let mut config = Config::default();
        config.encryption.max_message_size = 0;

        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("chak.toml");

        let mut config = Config::default();
        config.encryption.max_message_size = 4096;
        config.output.format = "json".to_string();
        config.save(&config_path).unwrap();

        let loaded = Config::load(&config_path).unwrap();
        assert_eq!(loaded.encryption.max_message_size, 4096);
        assert_eq!(loaded.output.format, "json");
        assert_eq!(loaded.logging.level, config.logging.level);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad.toml");
        std::fs::write(&config_path, "[logging]\nlevel = \"loud\"\n").unwrap();

        assert!(matches!(
            Config::load(&config_path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        std::fs::write(&config_path, "[output\nformat = ").unwrap();

        assert!(matches!(
            Config::load(&config_path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_custom_path_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("absent.toml");

        assert!(matches!(
            Config::load_from(Some(&missing)),
            Err(ConfigError::Read(_))
        ));
    }

    #[test]
    fn test_cli_overrides() {
        let overrides = CliOverrides {
            output_format: Some("json".to_string()),
            verbose: Some(true),
            debug: Some(true),
        };

        let config = Config::default().with_overrides(&overrides);

        assert_eq!(config.output.format, "json");
        assert!(config.output.verbose);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_verbose_override_raises_log_level() {
        let overrides = CliOverrides {
            verbose: Some(true),
            ..Default::default()
        };

        let config = Config::default().with_overrides(&overrides);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_log_filter_follows_overrides() {
        let config = Config::default();
        assert_eq!(config.log_filter().max_level_hint(), Some(LevelFilter::WARN));

        let debug = CliOverrides {
            debug: Some(true),
            ..Default::default()
        };
        assert_eq!(
            config.clone().with_overrides(&debug).log_filter().max_level_hint(),
            Some(LevelFilter::DEBUG)
        );

        let verbose = CliOverrides {
            verbose: Some(true),
            ..Default::default()
        };
        assert_eq!(
            config.with_overrides(&verbose).log_filter().max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }

    #[test]
    fn test_log_filter_falls_back_on_garbage() {
        let mut config = Config::default();
        config.logging.level = "chak=loud".to_string();
        assert_eq!(config.log_filter().max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_empty_overrides_keep_file_values() {
        let mut config = Config::default();
        config.output.format = "quiet".to_string();

        let config = config.with_overrides(&CliOverrides::default());
        assert_eq!(config.output.format, "quiet");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_toml_parsing() {
        let toml_content = r#"
[encryption]
max_message_size = 1024

[output]
format = "json"

[logging]
level = "debug"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();

        assert_eq!(config.encryption.max_message_size, 1024);
        assert_eq!(config.output.format, "json");
        assert!(!config.output.verbose);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_sample_toml_is_valid() {
        let config: Config = toml::from_str(Config::sample_toml()).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_path() {
        let path = Config::default_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("chak.toml"));
    }

    #[test]
    fn test_load_from_none() {
        assert!(Config::load_from(None).is_ok());
    }
}
