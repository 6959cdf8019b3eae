//! Credential error types.

use std::path::PathBuf;

/// Error type for credential resolution.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// No source produced credentials.
    #[error(
        "Could not determine credentials: set {path_var} to a credential file \
         or set the {prefix}SENDER and {prefix}PASSWORD variables"
    )]
    CredentialsNotFound {
        /// Variable naming the credential file.
        path_var: &'static str,
        /// Reserved variable prefix.
        prefix: &'static str,
    },

    /// The credential file is unreadable or malformed.
    #[error("Invalid credential file {}: {reason}", .path.display())]
    InvalidCredentialFile {
        /// Path taken from the environment.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// Prefixed variables are present but required ones are missing.
    #[error(
        "Environment credentials are incomplete, missing {}",
        .missing.join(", ")
    )]
    IncompleteEnvironmentCredentials {
        /// Names of the unset variables.
        missing: Vec<&'static str>,
    },

    /// No host was given and none is known for the sender's domain.
    #[error("Cannot infer SMTP host for {address:?}; set the host explicitly")]
    HostInference {
        /// The sender address.
        address: String,
    },

    /// A port value is not a number in 1-65535.
    #[error("Invalid port {value:?}: must be 1-65535")]
    InvalidPort {
        /// The raw value.
        value: String,
    },

    /// A resolved field failed validation.
    #[error("Invalid credential field {field}: {reason}")]
    InvalidCredential {
        /// Field name.
        field: &'static str,
        /// What was wrong with it.
        reason: &'static str,
    },
}

/// Result type for credential operations.
pub type CredentialResult<T> = std::result::Result<T, CredentialError>;
