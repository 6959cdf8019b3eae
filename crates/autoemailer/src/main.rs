//! `autoemailer` - send email from scripts and cron jobs.
//!
//! Resolves SMTP credentials from a file or the environment, composes a
//! message and sends it in one blocking call.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;

use anyhow::{Context, Result};
use autoemailer_core::{CredentialSet, Mailer, TemplateArgs, default_credentials};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{CheckArgs, Cli, Command, SendArgs};

const DEFAULT_FILTER: &str = "autoemailer=info,autoemailer_core=info,autoemailer_smtp=info";
const VERBOSE_FILTER: &str = "autoemailer=debug,autoemailer_core=debug,autoemailer_smtp=debug";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let fallback = if cli.verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let credentials = match &cli.credentials {
        Some(path) => CredentialSet::from_file(path)
            .with_context(|| format!("Failed to load credentials from {}", path.display()))?,
        None => default_credentials().context("Failed to resolve credentials")?,
    };

    match cli.command {
        Command::Send(args) => send(credentials, args),
        Command::Check(args) => check(credentials, &args),
    }
}

fn send(credentials: CredentialSet, args: SendArgs) -> Result<()> {
    let mut mailer = Mailer::new(credentials);

    let mut builder = mailer.compose().to_many(args.to).subject(args.subject);
    if let Some(body) = args.body {
        builder = builder.body(body);
    }
    if let Some(template) = args.template {
        builder = builder.template(template, args.vars.into_iter().collect::<TemplateArgs>());
    }
    for path in args.attach {
        builder = builder.attach(path);
    }

    let message = builder.build().context("Failed to compose message")?;
    mailer.send(&message).context("Failed to send message")?;

    info!("Message sent");
    Ok(())
}

fn check(credentials: CredentialSet, args: &CheckArgs) -> Result<()> {
    println!("sender: {}", credentials.sender_email());
    println!("host:   {}", credentials.host());
    println!("port:   {}", credentials.port());

    if args.login {
        let mut mailer = Mailer::new(credentials);
        mailer.connect().context("Login failed")?;
        mailer.disconnect().context("Logout failed")?;
        println!("login:  ok");
    }

    Ok(())
}
