//! Connection configuration types.

use std::fmt;
use std::time::Duration;

/// Default connect and I/O timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default submission port.
pub const SUBMISSION_PORT: u16 = 587;

/// Implicit TLS submission port.
pub const SUBMISSIONS_PORT: u16 = 465;

/// Connection security mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// No encryption. **Only for local test relays.**
    None,
    /// Start with plaintext, upgrade with STARTTLS (port 587).
    #[default]
    StartTls,
    /// TLS from the start (port 465).
    Implicit,
}

impl Security {
    /// Picks the conventional mode for a port.
    #[must_use]
    pub const fn for_port(port: u16) -> Self {
        match port {
            SUBMISSIONS_PORT => Self::Implicit,
            _ => Self::StartTls,
        }
    }

    /// Get display name for the security mode.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::None => "None (insecure)",
            Self::StartTls => "STARTTLS",
            Self::Implicit => "SSL/TLS",
        }
    }
}

/// SMTP connection configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Security mode.
    pub security: Security,
    /// Connect and read/write timeout.
    pub timeout: Duration,
    /// Name sent with EHLO.
    pub hello_name: String,
}

impl Config {
    /// Creates a STARTTLS configuration on port 587.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self::builder(host).build()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder::new(host)
    }

    /// Returns `host:port`.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for connection configuration.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    host: String,
    port: Option<u16>,
    security: Option<Security>,
    timeout: Duration,
    hello_name: String,
}

impl ConfigBuilder {
    /// Creates a new builder with the given hostname.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            security: None,
            timeout: DEFAULT_TIMEOUT,
            hello_name: "localhost".to_string(),
        }
    }

    /// Sets the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the security mode. Defaults to [`Security::for_port`].
    #[must_use]
    pub const fn security(mut self, security: Security) -> Self {
        self.security = Some(security);
        self
    }

    /// Sets the connect and I/O timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the EHLO client name.
    #[must_use]
    pub fn hello_name(mut self, name: impl Into<String>) -> Self {
        self.hello_name = name.into();
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        let port = self.port.unwrap_or(SUBMISSION_PORT);
        Config {
            host: self.host,
            port,
            security: self.security.unwrap_or_else(|| Security::for_port(port)),
            timeout: self.timeout,
            hello_name: self.hello_name,
        }
    }
}

/// Account used for the AUTH exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct Login {
    /// Username, normally the sender address.
    pub username: String,
    password: String,
}

impl Login {
    /// Creates login credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the secret.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Login")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
