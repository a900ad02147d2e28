//! Output formatting for CLI results
//!
//! It supports three output formats:
//! - Text: plain values, tables for multi-field results (default)
//! - JSON: a `{ success, data, error, timestamp, command }` wrapper
//! - Quiet: no output, exit codes only

use std::str::FromStr;

use chak_crypto::{EncodedKeyPair, EncryptedEnvelope};
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;

use crate::ExitCode;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain values for humans and pipes
    #[default]
    Text,
    /// JSON format for scripting
    Json,
    /// Minimal output - exit codes only
    Quiet,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "quiet" => Ok(Self::Quiet),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Quiet => write!(f, "quiet"),
        }
    }
}

/// Standard JSON response wrapper for consistent schema
#[derive(Serialize)]
pub struct JsonResponse<T: Serialize> {
    /// Whether the operation was successful
    pub success: bool,
    /// The response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// RFC 3339 timestamp
    pub timestamp: String,
    /// Command that was executed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl<T: Serialize> JsonResponse<T> {
    /// Create a successful response with command context
    pub fn success_with_command(data: T, command: &str) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
            command: Some(command.to_string()),
        }
    }
}

impl JsonResponse<()> {
    /// Create an error response with command context
    pub fn error_with_command(message: &str, command: &str) -> JsonResponse<()> {
        JsonResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
            timestamp: chrono::Utc::now().to_rfc3339(),
            command: Some(command.to_string()),
        }
    }
}

/// Formats output for different modes
pub struct OutputFormatter {
    format: OutputFormat,
    verbose: bool,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Get the current output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.format == OutputFormat::Quiet
    }

    /// Format a freshly generated key pair
    pub fn format_key_pair(&self, pair: &EncodedKeyPair) -> String {
        match self.format {
            OutputFormat::Text => {
                let mut table = Table::new();
                table.load_preset(UTF8_FULL);
                table.set_header(vec!["Key", "Value"]);
                table.add_row(vec!["Public", pair.public_key.as_str()]);
                table.add_row(vec!["Private", pair.private_key.as_str()]);
                table.to_string()
            }
            OutputFormat::Json => self.to_json_response(pair, "keygen"),
            OutputFormat::Quiet => String::new(),
        }
    }

    /// Format an envelope; text mode prints the bare wire JSON
    pub fn format_envelope(&self, envelope: &EncryptedEnvelope) -> String {
        match self.format {
            OutputFormat::Text => serde_json::to_string(envelope)
                .unwrap_or_else(|e| format!("Error: serialization failed: {e}")),
            OutputFormat::Json => self.to_json_response(envelope, "encrypt"),
            OutputFormat::Quiet => String::new(),
        }
    }

    /// Format a single named value such as a plaintext or key
    pub fn format_value(&self, name: &str, value: &str, command: &str) -> String {
        match self.format {
            OutputFormat::Text => value.to_string(),
            OutputFormat::Json => {
                let mut data = serde_json::Map::new();
                data.insert(name.to_string(), serde_json::Value::from(value));
                self.to_json_response(&data, command)
            }
            OutputFormat::Quiet => String::new(),
        }
    }

    /// Format error with exit code context
    pub fn format_error_with_code(
        &self,
        error: &dyn std::error::Error,
        code: ExitCode,
        command: &str,
    ) -> String {
        match self.format {
            OutputFormat::Text => format!("Error: {error}"),
            OutputFormat::Json => {
                let response = JsonResponse::error_with_command(&error.to_string(), command);
                match serde_json::to_value(&response) {
                    Ok(mut output) => {
                        output["exit_code"] = serde_json::json!(code as i32);
                        output["exit_code_name"] = serde_json::json!(code.name());
                        self.to_json(&output)
                    }
                    Err(e) => format!("{{\"error\": \"{e}\"}}"),
                }
            }
            OutputFormat::Quiet => String::new(),
        }
    }

    /// Format progress message (only shown in verbose text mode)
    pub fn progress(&self, message: &str) {
        if self.verbose && self.format == OutputFormat::Text {
            eprintln!("... {message}");
        }
    }

    fn to_json<T: Serialize>(&self, value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }

    fn to_json_response<T: Serialize>(&self, value: &T, command: &str) -> String {
        let response = JsonResponse::success_with_command(value, command);
        serde_json::to_string_pretty(&response).unwrap_or_else(|e| {
            let err_response =
                JsonResponse::error_with_command(&format!("Serialization error: {e}"), command);
            self.to_json(&err_response)
        })
    }
}
