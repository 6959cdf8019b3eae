//! # autoemailer-core
//!
//! Send an email from a script without managing an SMTP session.
//!
//! This crate provides:
//! - **Credential resolution** from a JSON file or `EMAILER_*` environment
//!   variables, with the SMTP host inferred from well-known sender domains
//! - **Message composition** with a literal or templated text body and file
//!   attachments
//! - **Dispatch** through a [`Mailer`] that logs in lazily and reconnects once
//!   if the server dropped the session
//!
//! ## Quick Start
//!
//! ```ignore
//! use autoemailer_core::Mailer;
//!
//! let mut mailer = Mailer::from_env()?;
//! let message = mailer
//!     .compose()
//!     .to("you@example.org")
//!     .subject("Nightly report")
//!     .body("All green.")
//!     .attach("report.csv")
//!     .build()?;
//! mailer.send(&message)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod compose;
pub mod config;
pub mod credentials;
mod error;
pub mod service;

pub use compose::{Attachment, ComposeError, ComposeResult, Message, MessageBuilder, TemplateArgs};
pub use config::{ConfigSource, EnvSource, MapSource};
pub use credentials::{
    CredentialError, CredentialInfo, CredentialProvider, CredentialResult, CredentialSet,
    ProviderChain, default_credentials,
};
pub use error::{Error, Result};
pub use service::{Mailer, MailerBuilder};

pub use autoemailer_smtp::{Security, Transport};
