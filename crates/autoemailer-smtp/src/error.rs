//! Error types for SMTP operations.

use std::io;

use lettre::transport::smtp;

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SMTP error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The session could not be established or was dropped by the server.
    #[error("Connection to {endpoint} failed: {message}")]
    Connection {
        /// `host:port` of the server.
        endpoint: String,
        /// Underlying failure.
        message: String,
    },

    /// TLS negotiation failed.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The server refused the login.
    #[error("Authentication failed for {username}: {message}")]
    Authentication {
        /// Account used to log in.
        username: String,
        /// Server or client reason.
        message: String,
    },

    /// Server rejected the transaction (sender, recipient or data).
    #[error("Server rejected the message: {0}")]
    Rejected(String),

    /// Feature not supported by server.
    #[error("Server does not support {0}")]
    NotSupported(String),

    /// No session is open.
    #[error("Not connected to an SMTP server")]
    NotConnected,

    /// Protocol error (unexpected or unparseable response).
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl Error {
    /// Returns true if the session was never established or has been dropped.
    ///
    /// These are the only failures a caller may recover from by reconnecting.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::NotConnected)
    }

    /// Returns true if the server refused the credentials.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}

/// Point in the session where a lettre error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    /// TCP connect, greeting, EHLO and STARTTLS.
    Connect,
    /// AUTH exchange.
    Auth,
    /// MAIL FROM / RCPT TO / DATA.
    Send,
    /// QUIT.
    Quit,
}

/// Reply code servers use when closing the transmission channel.
const SERVICE_CLOSING: &str = "421";

/// lettre's message when the server closes the socket before replying.
const INCOMPLETE_RESPONSE: &str = "incomplete response";

/// Returns true if the peer closed or reset the socket.
fn is_dropped(err: &smtp::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<io::Error>() {
            return matches!(
                io.kind(),
                io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
            );
        }
        source = cause.source();
    }

    err.is_response() && err.status().is_none() && err.to_string().contains(INCOMPLETE_RESPONSE)
}

/// Classifies a lettre error into our taxonomy.
pub(crate) fn classify(err: &smtp::Error, stage: Stage, endpoint: &str, username: &str) -> Error {
    let connection = || Error::Connection {
        endpoint: endpoint.to_string(),
        message: err.to_string(),
    };

    if err.is_timeout() || is_dropped(err) {
        return connection();
    }
    if err.is_tls() {
        return Error::Tls(err.to_string());
    }
    if err
        .status()
        .is_some_and(|code| code.to_string() == SERVICE_CLOSING)
    {
        return connection();
    }

    let authentication = || Error::Authentication {
        username: username.to_string(),
        message: err.to_string(),
    };

    if err.is_permanent() || err.is_transient() {
        return match stage {
            Stage::Connect => connection(),
            Stage::Auth => authentication(),
            Stage::Send => Error::Rejected(err.to_string()),
            Stage::Quit => Error::Protocol(err.to_string()),
        };
    }
    if err.is_client() {
        return match stage {
            Stage::Auth => authentication(),
            Stage::Connect | Stage::Send | Stage::Quit => Error::Protocol(err.to_string()),
        };
    }
    if err.is_response() {
        return Error::Protocol(err.to_string());
    }

    // Network and connection kinds have no dedicated predicate.
    connection()
}
