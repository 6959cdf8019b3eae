//! Error types for the core library.

use thiserror::Error;

use crate::compose::ComposeError;
use crate::credentials::CredentialError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials could not be resolved.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// The message could not be composed.
    #[error(transparent)]
    Compose(#[from] ComposeError),

    /// The SMTP session failed.
    #[error(transparent)]
    Smtp(#[from] autoemailer_smtp::Error),
}

impl Error {
    /// Returns true for dropped or never-established SMTP sessions.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Smtp(err) if err.is_connection())
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
