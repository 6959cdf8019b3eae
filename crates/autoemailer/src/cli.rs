//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Send email from scripts.
///
/// Credentials come from `--credentials`, the file named by
/// `EMAILER_CREDENTIALS`, or the `EMAILER_SENDER`/`EMAILER_PASSWORD`/
/// `EMAILER_HOST`/`EMAILER_PORT` variables, in that order.
#[derive(Debug, Parser)]
#[command(name = "autoemailer")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON credential file, used instead of the environment
    #[arg(long, global = true, value_name = "FILE")]
    pub credentials: Option<PathBuf>,

    /// Log at debug level unless `RUST_LOG` is set
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compose and send one message
    Send(SendArgs),

    /// Resolve credentials and show the account that would be used
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct SendArgs {
    /// Recipient address (repeatable)
    #[arg(long, required = true, value_name = "ADDRESS")]
    pub to: Vec<String>,

    /// Subject line
    #[arg(long, default_value = "")]
    pub subject: String,

    /// Literal body text
    #[arg(long, conflicts_with = "template")]
    pub body: Option<String>,

    /// Template file for the body
    #[arg(long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Template value as NAME=VALUE (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var, requires = "template")]
    pub vars: Vec<(String, String)>,

    /// File to attach (repeatable)
    #[arg(long, value_name = "PATH")]
    pub attach: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Also log in and out to verify the password
    #[arg(long)]
    pub login: bool,
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {raw:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty name in {raw:?}"));
    }
    Ok((name.to_string(), value.to_string()))
}
