//! SMTP dispatcher.

use std::time::Duration;

use autoemailer_smtp::{Config, DEFAULT_TIMEOUT, Security, SmtpTransport, Transport};
use tracing::{debug, info, warn};

use crate::compose::{Message, MessageBuilder};
use crate::credentials::{CredentialSet, default_credentials};
use crate::error::Result;

/// Sends messages for one account.
///
/// A mailer starts disconnected, logs in on the first [`Mailer::send`] (or
/// on [`MailerBuilder::build`] with `connect_on_build`), and logs out after
/// each send unless built with `keep_alive`.
///
/// If a send fails because the session dropped or was never established, the
/// mailer reconnects once and retries the send once. Any other failure is
/// returned as is.
///
/// A mailer is not synchronised; share it across threads only behind a lock,
/// or build one per worker.
#[derive(Debug)]
pub struct Mailer<T: Transport = SmtpTransport> {
    credentials: CredentialSet,
    config: Config,
    transport: T,
    connected: bool,
    keep_alive: bool,
}

impl Mailer<SmtpTransport> {
    /// Creates a disconnected mailer with default settings.
    #[must_use]
    pub fn new(credentials: CredentialSet) -> Self {
        Self::with_transport(credentials, SmtpTransport::new())
    }

    /// Creates a mailer from credentials found in the process environment.
    ///
    /// # Errors
    ///
    /// Returns a credential error if no source yields usable credentials.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(default_credentials()?))
    }

    /// Starts a builder for custom settings.
    #[must_use]
    pub fn builder(credentials: CredentialSet) -> MailerBuilder {
        MailerBuilder::new(credentials)
    }
}

impl<T: Transport> Mailer<T> {
    /// Creates a disconnected mailer over `transport` with default settings.
    #[must_use]
    pub fn with_transport(credentials: CredentialSet, transport: T) -> Self {
        let config = Config::builder(credentials.host())
            .port(credentials.port())
            .build();
        Self {
            credentials,
            config,
            transport,
            connected: false,
            keep_alive: false,
        }
    }

    /// The account this mailer sends for.
    #[must_use]
    pub const fn credentials(&self) -> &CredentialSet {
        &self.credentials
    }

    /// Connection settings.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns true after a successful login until logout or a failed send.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    /// Starts a message from this account's address.
    #[must_use]
    pub fn compose(&self) -> MessageBuilder {
        MessageBuilder::new(self.credentials.sender_email())
    }

    /// Connects, negotiates encryption and logs in.
    ///
    /// # Errors
    ///
    /// Returns a connection-class error if the server cannot be reached and
    /// an authentication error if the login is refused.
    pub fn connect(&mut self) -> Result<()> {
        self.connected = false;
        self.transport
            .connect(&self.config, &self.credentials.login())?;
        self.connected = true;
        Ok(())
    }

    /// Logs out. Does nothing if not connected.
    ///
    /// A session the server already dropped counts as logged out.
    ///
    /// # Errors
    ///
    /// Returns an error if the server answered QUIT with a failure.
    pub fn disconnect(&mut self) -> Result<()> {
        if !self.connected {
            return Ok(());
        }
        self.connected = false;

        match self.transport.disconnect() {
            Ok(()) => {
                debug!("Logged out of {}", self.config.endpoint());
                Ok(())
            }
            Err(err) if err.is_connection() => {
                debug!("Session already closed: {err}");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Sends a message, connecting first if needed.
    ///
    /// The message is converted before any network call, so composition
    /// errors never open a session.
    ///
    /// # Errors
    ///
    /// Returns a compose error for a message that cannot be encoded, the
    /// reconnect error if recovery fails to log in again, and otherwise the
    /// error from the first send attempt.
    pub fn send(&mut self, message: &Message) -> Result<()> {
        let email = message.to_lettre()?;
        let envelope = email.envelope();
        let formatted = email.formatted();

        if !self.connected {
            self.connect()?;
        }

        let outcome = match self.transport.send(envelope, &formatted) {
            Ok(()) => Ok(()),
            Err(err) if err.is_connection() => {
                warn!(
                    "Send via {} failed ({err}), reconnecting once",
                    self.config.endpoint()
                );
                self.connect()?;
                self.transport.send(envelope, &formatted).map_err(|retry| {
                    debug!("Retry failed: {retry}");
                    err
                })
            }
            Err(err) => Err(err),
        };

        match outcome {
            Ok(()) => {
                info!(
                    "Sent \"{}\" to {} recipient(s)",
                    message.subject(),
                    message.to().len()
                );
                if !self.keep_alive {
                    self.logout_quietly();
                }
                Ok(())
            }
            Err(err) => {
                self.connected = false;
                Err(err.into())
            }
        }
    }

    /// Logs out after a successful send; failures only warrant a warning.
    fn logout_quietly(&mut self) {
        if let Err(err) = self.disconnect() {
            warn!("Logout after send failed: {err}");
        }
    }
}

/// Builder for [`Mailer`].
#[derive(Debug)]
#[must_use]
pub struct MailerBuilder<T: Transport = SmtpTransport> {
    credentials: CredentialSet,
    transport: T,
    timeout: Duration,
    security: Option<Security>,
    hello_name: Option<String>,
    keep_alive: bool,
    connect_on_build: bool,
}

impl MailerBuilder<SmtpTransport> {
    /// Creates a builder with default settings.
    pub fn new(credentials: CredentialSet) -> Self {
        Self {
            credentials,
            transport: SmtpTransport::new(),
            timeout: DEFAULT_TIMEOUT,
            security: None,
            hello_name: None,
            keep_alive: false,
            connect_on_build: false,
        }
    }
}

impl<T: Transport> MailerBuilder<T> {
    /// Sets the connect and I/O timeout.
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the security mode chosen from the port.
    pub const fn security(mut self, security: Security) -> Self {
        self.security = Some(security);
        self
    }

    /// Sets the EHLO client name.
    pub fn hello_name(mut self, name: impl Into<String>) -> Self {
        self.hello_name = Some(name.into());
        self
    }

    /// Keeps the session open between sends.
    pub const fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Logs in when the mailer is built instead of on first send.
    pub const fn connect_on_build(mut self, connect: bool) -> Self {
        self.connect_on_build = connect;
        self
    }

    /// Replaces the transport.
    pub fn transport<U: Transport>(self, transport: U) -> MailerBuilder<U> {
        MailerBuilder {
            credentials: self.credentials,
            transport,
            timeout: self.timeout,
            security: self.security,
            hello_name: self.hello_name,
            keep_alive: self.keep_alive,
            connect_on_build: self.connect_on_build,
        }
    }

    /// Builds the mailer, logging in if `connect_on_build` is set.
    ///
    /// # Errors
    ///
    /// Returns the login error when connecting on build fails.
    pub fn build(self) -> Result<Mailer<T>> {
        let mut config = Config::builder(self.credentials.host())
            .port(self.credentials.port())
            .timeout(self.timeout);
        if let Some(security) = self.security {
            config = config.security(security);
        }
        if let Some(name) = self.hello_name {
            config = config.hello_name(name);
        }

        let mut mailer = Mailer {
            credentials: self.credentials,
            config: config.build(),
            transport: self.transport,
            connected: false,
            keep_alive: self.keep_alive,
        };
        if self.connect_on_build {
            mailer.connect()?;
        }
        Ok(mailer)
    }
}
