//! CLI argument parsing and the provisioning run.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use certgen::{already_provisioned, provision, CertConfig, Outcome, CERT_FILE_NAME, KEY_FILE_NAME};
use clap::Parser;
use colored::Colorize;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::EnvFilter;

/// Generate a self-signed TLS key/certificate pair for the RemoteNote
/// KOReader plugin server.
///
/// Writes cert.pem and key.pem into the target directory and does nothing
/// when both files already exist.
#[derive(Parser, Debug)]
#[command(name = "certgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to provision (defaults to the current working directory)
    #[arg(short = 'C', long = "dir", value_name = "PATH")]
    pub dir: Option<PathBuf>,
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dir = match cli.dir {
        Some(dir) => dir,
        None => env::current_dir().context("failed to determine current working directory")?,
    };

    if already_provisioned(&dir) {
        println!("{CERT_FILE_NAME} and {KEY_FILE_NAME} already exist, skipping generation.");
        return Ok(());
    }

    println!("Generating new TLS certificates...");

    match provision(&dir, &CertConfig::default())? {
        Outcome::AlreadyProvisioned => {
            // Another invocation won the race between the check and now.
            println!("{CERT_FILE_NAME} and {KEY_FILE_NAME} already exist, skipping generation.");
        }
        Outcome::Generated(summary) => {
            println!(
                "{} generated {CERT_FILE_NAME} and {KEY_FILE_NAME}.",
                "Success:".green().bold()
            );
            println!("  {} {}", "subject:".bold(), summary.subject);
            println!("  {} {}", "serial:".bold(), summary.serial);
            println!(
                "  {} {}",
                "expires:".bold(),
                summary
                    .not_after
                    .format(&Rfc3339)
                    .context("failed to format expiry timestamp")?
            );
            println!("  {} sha256:{}", "fingerprint:".bold(), summary.fingerprint);
        }
    }

    Ok(())
}
