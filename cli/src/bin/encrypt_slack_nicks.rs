//! Encrypts or decrypts the Slack nicks file.
//!
//! `slack_nicks.yaml` maps GitHub logins to Slack user ids. Only the
//! encrypted copy, `slack_nicks_encrypted.yaml`, belongs in version control.

use clap::Parser;
use pr_review_queue::nicks::{DEFAULT_NICKS_FILE, DEFAULT_PLAIN_NICKS_FILE};
use pr_review_queue::runner::{EXIT_CONFIGURATION, EXIT_FAILURE};
use pr_review_queue::{NicksCipher, NicksError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Encrypt slack_nicks.yaml to slack_nicks_encrypted.yaml, or the reverse.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Decrypt the encrypted file instead of encrypting the plain one.
    #[arg(short, long, conflicts_with = "generate_new_key")]
    decrypt: bool,

    /// Print a new key and exit.
    #[arg(short, long)]
    generate_new_key: bool,

    /// File to convert. Defaults to the conventional file for the direction.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Fernet key.
    #[arg(long, env = "SLACK_NICKS_KEY", hide_env_values = true)]
    key: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.generate_new_key {
        println!("SECRET KEY - DO NOT SHARE!");
        println!("export SLACK_NICKS_KEY={}", NicksCipher::generate_key());
        return ExitCode::SUCCESS;
    }

    match convert(&args) {
        Ok(target) => {
            info!(path = %target.display(), "Conversion complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Conversion failed");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn convert(args: &Args) -> Result<PathBuf, NicksError> {
    let key = args.key.as_deref().ok_or(NicksError::InvalidKey)?;
    let cipher = NicksCipher::new(key)?;

    if args.decrypt {
        let source = args.file.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_NICKS_FILE));
        cipher.decrypt_file(&source)
    } else {
        let source = args
            .file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PLAIN_NICKS_FILE));
        cipher.encrypt_file(&source)
    }
}

fn exit_code(error: &NicksError) -> u8 {
    match error {
        NicksError::InvalidKey => EXIT_CONFIGURATION,
        NicksError::Io { .. } | NicksError::Yaml { .. } | NicksError::Decrypt { .. } => EXIT_FAILURE,
    }
}
