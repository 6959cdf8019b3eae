//! Blocking SMTP transport.

use std::fmt;

use lettre::address::Envelope;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{SmtpConnection, TlsParameters};
use lettre::transport::smtp::extension::ClientId;
use tracing::{debug, info};

use crate::config::{Config, Login, Security};
use crate::error::{Error, Result, Stage, classify};

/// Mechanisms offered during AUTH, in preference order.
const AUTH_MECHANISMS: &[Mechanism] = &[Mechanism::Plain, Mechanism::Login];

/// A session-oriented mail transport.
///
/// Implementations hold at most one open session. All calls block until the
/// server answers or the configured timeout elapses.
pub trait Transport {
    /// Opens a session: connect, negotiate encryption, authenticate.
    ///
    /// Any session already open is dropped first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the server cannot be reached,
    /// [`Error::Tls`] if encryption cannot be negotiated and
    /// [`Error::Authentication`] if the login is refused.
    fn connect(&mut self, config: &Config, login: &Login) -> Result<()>;

    /// Transmits one message over the open session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] without a session, a connection-class
    /// error if the session dropped, or [`Error::Rejected`] if the server
    /// refused the transaction.
    fn send(&mut self, envelope: &Envelope, message: &[u8]) -> Result<()>;

    /// Ends the session with QUIT. Without a session this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the server did not acknowledge QUIT.
    fn disconnect(&mut self) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self, config: &Config, login: &Login) -> Result<()> {
        (**self).connect(config, login)
    }

    fn send(&mut self, envelope: &Envelope, message: &[u8]) -> Result<()> {
        (**self).send(envelope, message)
    }

    fn disconnect(&mut self) -> Result<()> {
        (**self).disconnect()
    }
}

/// Open session state.
struct Session {
    conn: SmtpConnection,
    endpoint: String,
    username: String,
}

/// SMTP transport backed by lettre's blocking client connection.
#[derive(Default)]
pub struct SmtpTransport {
    session: Option<Session>,
}

impl SmtpTransport {
    /// Creates a transport with no open session.
    #[must_use]
    pub const fn new() -> Self {
        Self { session: None }
    }

    /// Returns true while a session is open.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    fn open(config: &Config, login: &Login) -> Result<Session> {
        let endpoint = config.endpoint();
        let fail = |err: &lettre::transport::smtp::Error, stage: Stage| {
            classify(err, stage, &endpoint, &login.username)
        };
        let hello = ClientId::Domain(config.hello_name.clone());

        let tls = match config.security {
            Security::None => None,
            Security::StartTls | Security::Implicit => Some(
                TlsParameters::new(config.host.clone()).map_err(|e| Error::Tls(e.to_string()))?,
            ),
        };
        let implicit = match config.security {
            Security::Implicit => tls.as_ref(),
            Security::None | Security::StartTls => None,
        };

        debug!(
            "Connecting to {endpoint} ({})",
            config.security.display_name()
        );
        let mut conn = SmtpConnection::connect(
            (config.host.as_str(), config.port),
            Some(config.timeout),
            &hello,
            implicit,
            None,
        )
        .map_err(|e| fail(&e, Stage::Connect))?;

        if let (Security::StartTls, Some(params)) = (config.security, tls.as_ref()) {
            if !conn.can_starttls() {
                conn.abort();
                return Err(Error::NotSupported("STARTTLS".into()));
            }
            debug!("Upgrading {endpoint} with STARTTLS");
            conn.starttls(params, &hello)
                .map_err(|e| fail(&e, Stage::Connect))?;
        }

        let credentials = Credentials::new(login.username.clone(), login.password().to_string());
        conn.auth(AUTH_MECHANISMS, &credentials)
            .map_err(|e| fail(&e, Stage::Auth))?;

        info!("Logged in to {endpoint} as {}", login.username);
        Ok(Session {
            conn,
            endpoint,
            username: login.username.clone(),
        })
    }
}

impl Transport for SmtpTransport {
    fn connect(&mut self, config: &Config, login: &Login) -> Result<()> {
        if let Some(mut previous) = self.session.take() {
            previous.conn.abort();
        }
        self.session = Some(Self::open(config, login)?);
        Ok(())
    }

    fn send(&mut self, envelope: &Envelope, message: &[u8]) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Err(Error::NotConnected);
        };

        match session.conn.send(envelope, message) {
            Ok(_) => {
                debug!("Message accepted by {}", session.endpoint);
                Ok(())
            }
            Err(err) => {
                let err = classify(&err, Stage::Send, &session.endpoint, &session.username);
                // lettre aborts the session whenever a transaction fails.
                self.session = None;
                Err(err)
            }
        }
    }

    fn disconnect(&mut self) -> Result<()> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };

        debug!("Closing session with {}", session.endpoint);
        session
            .conn
            .quit()
            .map(|_| ())
            .map_err(|e| classify(&e, Stage::Quit, &session.endpoint, &session.username))
    }
}

impl fmt::Debug for SmtpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpTransport")
            .field(
                "endpoint",
                &self.session.as_ref().map(|s| s.endpoint.as_str()),
            )
            .finish()
    }
}
