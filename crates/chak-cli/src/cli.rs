//! CLI command definitions and argument parsing

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use chak_crypto::{CryptoError, CryptoResult, EncryptedEnvelope, EncryptionService};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use crate::config::Config;
use crate::output::{OutputFormat, OutputFormatter};
use crate::ExitCode;

/// Argument value that means "read from stdin".
const STDIN_MARKER: &str = "-";

/// chak - ChakChat end-to-end encryption tool
#[derive(Parser, Debug)]
#[command(name = "chak")]
#[command(version, about = "ChakChat end-to-end encryption tool")]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: text, json, quiet (overrides config)
    #[arg(long, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a key pair
    Keygen(KeygenArgs),
    /// Encrypt a message for a recipient's public key
    Encrypt(EncryptArgs),
    /// Decrypt an envelope with a private key
    Decrypt(DecryptArgs),
    /// Derive a key shared with a peer
    Derive(DeriveArgs),
    /// Encrypt under a symmetric key
    Seal(SealArgs),
    /// Decrypt under a symmetric key
    Open(OpenArgs),
    /// Sign an envelope as its sender
    Sign(SignArgs),
    /// Verify a sender signature over an envelope
    Verify(VerifyArgs),
}

impl Commands {
    /// Name used in JSON responses and logs
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Keygen(_) => "keygen",
            Commands::Encrypt(_) => "encrypt",
            Commands::Decrypt(_) => "decrypt",
            Commands::Derive(_) => "derive",
            Commands::Seal(_) => "seal",
            Commands::Open(_) => "open",
            Commands::Sign(_) => "sign",
            Commands::Verify(_) => "verify",
        }
    }
}

/// Arguments for the keygen command
#[derive(Parser, Debug)]
pub struct KeygenArgs {
    /// Generate an Ed25519 signing identity instead of an encryption key pair
    #[arg(long)]
    pub signing: bool,
}

/// Arguments for the encrypt command
#[derive(Parser, Debug)]
pub struct EncryptArgs {
    /// Recipient public key (base64)
    #[arg(long = "to", value_name = "PUBLIC_KEY")]
    pub to: String,

    /// Message to encrypt, or - for stdin
    pub message: String,
}

/// Arguments for the decrypt command
#[derive(Parser, Debug)]
pub struct DecryptArgs {
    /// Private key (base64)
    #[arg(long, env = "CHAK_PRIVATE_KEY", hide_env_values = true, value_name = "PRIVATE_KEY")]
    pub key: String,

    /// Envelope JSON, or - for stdin
    pub envelope: String,
}

/// Arguments for the derive command
#[derive(Parser, Debug)]
pub struct DeriveArgs {
    /// Own private key (base64)
    #[arg(long, env = "CHAK_PRIVATE_KEY", hide_env_values = true, value_name = "PRIVATE_KEY")]
    pub key: String,

    /// Peer public key (base64)
    #[arg(long, value_name = "PUBLIC_KEY")]
    pub peer: String,

    /// Print the raw X25519 output instead of the derived symmetric key
    #[arg(long)]
    pub raw: bool,
}

/// Arguments for the seal command
#[derive(Parser, Debug)]
pub struct SealArgs {
    /// Symmetric key (base64)
    #[arg(long, env = "CHAK_SYMMETRIC_KEY", hide_env_values = true, value_name = "SYMMETRIC_KEY")]
    pub key: String,

    /// Message to encrypt, or - for stdin
    pub message: String,
}

/// Arguments for the open command
#[derive(Parser, Debug)]
pub struct OpenArgs {
    /// Symmetric key (base64)
    #[arg(long, env = "CHAK_SYMMETRIC_KEY", hide_env_values = true, value_name = "SYMMETRIC_KEY")]
    pub key: String,

    /// Cipher text, or - for stdin
    pub ciphertext: String,
}

/// Arguments for the sign command
#[derive(Parser, Debug)]
pub struct SignArgs {
    /// Signing key seed (base64)
    #[arg(long, env = "CHAK_SIGNING_KEY", hide_env_values = true, value_name = "SIGNING_KEY")]
    pub key: String,

    /// Envelope JSON, or - for stdin
    pub envelope: String,
}

/// Arguments for the verify command
#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Sender verifying key (base64)
    #[arg(long = "from", value_name = "VERIFYING_KEY")]
    pub from: String,

    /// Sender signature (base64)
    #[arg(long, value_name = "SIGNATURE")]
    pub signature: String,

    /// Envelope JSON, or - for stdin
    pub envelope: String,
}

impl Cli {
    /// Execute the CLI command with a pre-loaded configuration
    pub fn execute_with_config(self, config: Config) -> anyhow::Result<ExitCode> {
        let service = EncryptionService::new(config.encryption.clone())
            .context("invalid encryption configuration")?;
        let format = config.output.format.parse::<OutputFormat>().unwrap_or_default();
        let formatter = OutputFormatter::new(format, config.output.verbose);

        let command = self.command.name();
        info!(command, "running command");

        let (result, code) = match self.command {
            Commands::Keygen(args) => {
                let result = if args.signing {
                    formatter.progress("Generating signing key pair...");
                    service.generate_signing_key_pair()
                } else {
                    formatter.progress("Generating key pair...");
                    service.generate_user_key_pair()
                };
                render(result, |pair| formatter.format_key_pair(pair))
            }
            Commands::Encrypt(args) => {
                let message = read_input(&args.message)?;
                render(service.encrypt_message(&message, args.to.trim()), |env| {
                    formatter.format_envelope(env)
                })
            }
            Commands::Decrypt(args) => {
                let envelope = read_input(&args.envelope)?;
                let result = parse_envelope(&envelope)
                    .and_then(|env| service.decrypt_message(&env, args.key.trim()));
                render(result, |text| formatter.format_value("plaintext", text, command))
            }
            Commands::Derive(args) => {
                let (name, result) = if args.raw {
                    (
                        "shared_secret",
                        service.derive_shared_secret(args.key.trim(), args.peer.trim()),
                    )
                } else {
                    (
                        "symmetric_key",
                        service.derive_symmetric_key(args.key.trim(), args.peer.trim()),
                    )
                };
                render(result, |key| formatter.format_value(name, key, command))
            }
            Commands::Seal(args) => {
                let message = read_input(&args.message)?;
                render(service.encrypt_symmetric(&message, args.key.trim()), |ct| {
                    formatter.format_value("ciphertext", ct, command)
                })
            }
            Commands::Open(args) => {
                let cipher_text = read_input(&args.ciphertext)?;
                render(
                    service.decrypt_symmetric(cipher_text.trim(), args.key.trim()),
                    |text| formatter.format_value("plaintext", text, command),
                )
            }
            Commands::Sign(args) => {
                let envelope = read_input(&args.envelope)?;
                let result = parse_envelope(&envelope)
                    .and_then(|env| service.sign_envelope(&env, args.key.trim()));
                render(result, |sig| formatter.format_value("signature", sig, command))
            }
            Commands::Verify(args) => {
                let envelope = read_input(&args.envelope)?;
                let result = parse_envelope(&envelope).and_then(|env| {
                    service.verify_envelope(&env, args.from.trim(), args.signature.trim())
                });
                render(result, |_| formatter.format_value("verified", "true", command))
            }
        };

        match result {
            Ok(out) => {
                if !out.is_empty() {
                    println!("{out}");
                }
            }
            Err(err) => {
                debug!(command, code = code.name(), "command failed");
                let out = formatter.format_error_with_code(&err, code, command);
                match formatter.format() {
                    OutputFormat::Json => println!("{out}"),
                    OutputFormat::Text => eprintln!("{out}"),
                    OutputFormat::Quiet => {}
                }
            }
        }
        Ok(code)
    }
}

/// Render a successful result, or pair the error with its exit code.
fn render<T>(
    result: CryptoResult<T>,
    format: impl FnOnce(&T) -> String,
) -> (Result<String, CryptoError>, ExitCode) {
    match result {
        Ok(value) => (Ok(format(&value)), ExitCode::Success),
        Err(err) => {
            let code = ExitCode::from(&err);
            (Err(err), code)
        }
    }
}

/// Resolve a positional argument, reading stdin for `-`.
fn read_input(arg: &str) -> anyhow::Result<String> {
    if arg != STDIN_MARKER {
        return Ok(arg.to_string());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(strip_newline(buf))
}

fn strip_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

/// Parse envelope JSON; malformed JSON is an input error.
fn parse_envelope(text: &str) -> CryptoResult<EncryptedEnvelope> {
    serde_json::from_str(text.trim())
        .map_err(|e| CryptoError::Input(format!("malformed envelope JSON: {e}")))
}
