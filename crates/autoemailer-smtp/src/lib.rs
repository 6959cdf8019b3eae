//! # autoemailer-smtp
//!
//! Blocking SMTP submission transport used by `autoemailer-core`.
//!
//! The wire protocol is handled by [lettre](https://lettre.rs)'s client
//! connection; this crate adds the session lifecycle the dispatcher needs:
//!
//! - **One session at a time**: connect, upgrade, authenticate, send, quit
//! - **STARTTLS by default**, implicit TLS on port 465, plaintext on request
//! - **Bounded blocking calls**: a single connect/I/O timeout (10s default)
//! - **Failure classification**: [`Error::is_connection`] separates dropped or
//!   never-established sessions from protocol-level rejections
//!
//! ## Quick Start
//!
//! ```ignore
//! use autoemailer_smtp::{Config, Login, SmtpTransport, Transport};
//!
//! let config = Config::new("smtp.gmail.com");
//! let login = Login::new("me@gmail.com", "app-password");
//!
//! let mut transport = SmtpTransport::new();
//! transport.connect(&config, &login)?;
//! transport.send(message.envelope(), &message.formatted())?;
//! transport.disconnect()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod transport;

pub use config::{
    Config, ConfigBuilder, DEFAULT_TIMEOUT, Login, SUBMISSION_PORT, SUBMISSIONS_PORT, Security,
};
pub use error::{Error, Result};
pub use lettre::address::Envelope;
pub use transport::{SmtpTransport, Transport};
