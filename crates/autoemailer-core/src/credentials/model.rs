//! Credential model types.

use std::fmt;
use std::path::Path;

use autoemailer_smtp::Login;
use tracing::warn;

use super::error::{CredentialError, CredentialResult};
use super::file::load_credential_file;
use super::resolve::fill_missing;
use crate::config::vars;

/// Partially-specified credentials, as read from a single source.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialInfo {
    /// Sender address.
    pub sender: Option<String>,
    /// Account password.
    pub password: Option<String>,
    /// SMTP host.
    pub host: Option<String>,
    /// SMTP port.
    pub port: Option<u16>,
}

impl CredentialInfo {
    /// Returns true if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sender.is_none() && self.password.is_none() && self.host.is_none() && self.port.is_none()
    }
}

impl fmt::Debug for CredentialInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialInfo")
            .field("sender", &self.sender)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

/// Fully resolved credentials for one SMTP account.
///
/// Every field is non-empty once constructed.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialSet {
    sender_email: String,
    password: String,
    host: String,
    port: u16,
}

impl CredentialSet {
    /// Creates a credential set from complete values.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::InvalidCredential`] if any field is empty,
    /// the sender is not an address, or the port is zero.
    pub fn new(
        sender_email: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        port: u16,
    ) -> CredentialResult<Self> {
        let sender_email = sender_email.into().trim().to_string();
        let password = password.into();
        let host = host.into().trim().to_string();

        if sender_email.is_empty() {
            return Err(invalid("sender", "is required"));
        }
        if !is_address(&sender_email) {
            return Err(invalid("sender", "must be an email address"));
        }
        if password.is_empty() {
            return Err(invalid("password", "is required"));
        }
        if host.is_empty() {
            return Err(invalid("host", "is required"));
        }
        if port == 0 {
            return Err(invalid("port", "must be 1-65535"));
        }

        Ok(Self {
            sender_email,
            password,
            host,
            port,
        })
    }

    /// Creates a credential set from caller-supplied values.
    ///
    /// Missing host or port is filled in as for any other source, with a
    /// warning suggesting they be given.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot be inferred or a field is invalid.
    pub fn explicit(
        sender_email: impl Into<String>,
        password: impl Into<String>,
        host: Option<String>,
        port: Option<u16>,
    ) -> CredentialResult<Self> {
        if host.is_none() || port.is_none() {
            warn!(
                "Explicit credentials without host or port; pass them or set {} and {}",
                vars::HOST,
                vars::PORT
            );
        }

        Self::from_info(CredentialInfo {
            sender: Some(sender_email.into()),
            password: Some(password.into()),
            host,
            port,
        })
    }

    /// Resolves partial credentials into a complete set.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot be inferred or a required field
    /// is missing or invalid.
    pub fn from_info(info: CredentialInfo) -> CredentialResult<Self> {
        let info = fill_missing(info)?;
        Self::new(
            info.sender.ok_or_else(|| invalid("sender", "is required"))?,
            info.password.ok_or_else(|| invalid("password", "is required"))?,
            info.host.ok_or_else(|| invalid("host", "is required"))?,
            info.port.ok_or_else(|| invalid("port", "is required"))?,
        )
    }

    /// Loads and resolves a JSON credential file.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::InvalidCredentialFile`] if the file cannot
    /// be read, is not JSON, or lacks required keys; otherwise as
    /// [`CredentialSet::from_info`].
    pub fn from_file(path: impl AsRef<Path>) -> CredentialResult<Self> {
        Self::from_info(load_credential_file(path.as_ref())?)
    }

    /// Sender address, also the login username.
    #[must_use]
    pub fn sender_email(&self) -> &str {
        &self.sender_email
    }

    /// Account password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// SMTP host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// SMTP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Login for the SMTP AUTH exchange.
    #[must_use]
    pub fn login(&self) -> Login {
        Login::new(self.sender_email.clone(), self.password.clone())
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("sender_email", &self.sender_email)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

const fn invalid(field: &'static str, reason: &'static str) -> CredentialError {
    CredentialError::InvalidCredential { field, reason }
}

/// A single `@` with something on both sides.
fn is_address(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty() && !domain.contains('@'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_fields() {
        assert!(CredentialSet::new("a@gmail.com", "x", "smtp.gmail.com", 587).is_ok());

        let cases = [
            ("", "x", "h", 587, "sender"),
            ("not-an-address", "x", "h", 587, "sender"),
            ("a@@b", "x", "h", 587, "sender"),
            ("a@b.com", "", "h", 587, "password"),
            ("a@b.com", "x", " ", 587, "host"),
            ("a@b.com", "x", "h", 0, "port"),
        ];
        for (sender, password, host, port, expected) in cases {
            let err = CredentialSet::new(sender, password, host, port).unwrap_err();
            assert!(
                matches!(err, CredentialError::InvalidCredential { field, .. } if field == expected),
                "{sender}/{host}/{port}: {err:?}"
            );
        }
    }

    #[test]
    fn test_explicit_fills_missing() {
        let creds = CredentialSet::explicit("a@gmail.com", "x", None, None).unwrap();
        assert_eq!(creds.host(), "smtp.gmail.com");
        assert_eq!(creds.port(), 587);
    }

    #[test]
    fn test_explicit_keeps_given_values() {
        let creds =
            CredentialSet::explicit("a@corp.example", "x", Some("mx.corp.example".into()), Some(2525))
                .unwrap();
        assert_eq!(creds.host(), "mx.corp.example");
        assert_eq!(creds.port(), 2525);
    }

    #[test]
    fn test_from_info_requires_sender() {
        let err = CredentialSet::from_info(CredentialInfo::default()).unwrap_err();
        assert!(matches!(
            err,
            CredentialError::InvalidCredential { field: "sender", .. }
        ));
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = CredentialSet::new("a@gmail.com", "hunter2", "smtp.gmail.com", 587).unwrap();
        assert!(!format!("{creds:?}").contains("hunter2"));

        let info = CredentialInfo {
            password: Some("hunter2".into()),
            ..CredentialInfo::default()
        };
        assert!(!format!("{info:?}").contains("hunter2"));
    }

    #[test]
    fn test_login_uses_sender() {
        let creds = CredentialSet::new("a@gmail.com", "x", "smtp.gmail.com", 587).unwrap();
        let login = creds.login();
        assert_eq!(login.username, "a@gmail.com");
        assert_eq!(login.password(), "x");
    }
}
