//! Integration tests for the SMTP transport.
//!
//! These tests only touch the loopback interface: a small scripted server
//! stands in for a real one.

#![allow(clippy::unwrap_used)]

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use autoemailer_smtp::{Config, Envelope, Error, Login, Security, SmtpTransport, Transport};

/// How the scripted server treats one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    /// Accept the whole session.
    Accept,
    /// Close the socket without replying to MAIL FROM.
    DropOnMail,
    /// Answer MAIL FROM with 421, then close.
    CloseOnMail,
    /// Reject every RCPT TO with 550.
    RejectRecipient,
    /// Answer QUIT with 554.
    RefuseQuit,
}

/// Loopback SMTP server that serves one script per accepted connection.
struct ScriptedServer {
    port: u16,
    connections: Arc<AtomicUsize>,
}

impl ScriptedServer {
    fn start(scripts: &[Script]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let connections = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&connections);
        let scripts = scripts.to_vec();
        thread::spawn(move || {
            for script in scripts {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = serve(stream, script);
            }
        });

        Self { port, connections }
    }

    fn config(&self) -> Config {
        Config::builder("127.0.0.1")
            .port(self.port)
            .security(Security::None)
            .timeout(Duration::from_secs(5))
            .build()
    }

    fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

fn serve(stream: TcpStream, script: Script) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;
    writer.write_all(b"220 fake.test ESMTP\r\n")?;

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let verb = line
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();

        let reply: &[u8] = match verb.as_str() {
            "EHLO" => b"250-fake.test\r\n250 AUTH PLAIN LOGIN\r\n",
            "AUTH" => b"235 2.7.0 Authenticated\r\n",
            "MAIL" => match script {
                Script::DropOnMail => return Ok(()),
                Script::CloseOnMail => {
                    writer.write_all(b"421 4.4.2 Idle timeout, closing\r\n")?;
                    return Ok(());
                }
                _ => b"250 OK\r\n",
            },
            "RCPT" if script == Script::RejectRecipient => b"550 5.1.1 No such user\r\n",
            "RCPT" => b"250 OK\r\n",
            "DATA" => {
                writer.write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n")?;
                skip_message(&mut reader)?;
                b"250 Queued\r\n"
            }
            "QUIT" if script == Script::RefuseQuit => b"554 QUIT refused\r\n",
            "QUIT" => {
                writer.write_all(b"221 Bye\r\n")?;
                return Ok(());
            }
            _ => b"250 OK\r\n",
        };
        writer.write_all(reply)?;
    }
}

fn skip_message(reader: &mut impl BufRead) -> io::Result<()> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 || line == ".\r\n" {
            return Ok(());
        }
    }
}

fn login() -> Login {
    Login::new("a@gmail.com", "x")
}

fn envelope() -> Envelope {
    Envelope::new(
        Some("a@gmail.com".parse().unwrap()),
        vec!["b@example.org".parse().unwrap()],
    )
    .unwrap()
}

const MESSAGE: &[u8] = b"Subject: hi\r\n\r\nhello\r\n";

/// Returns a loopback port nothing is listening on.
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn test_refused_connection_is_connection_class() {
    init_tracing();

    let config = Config::builder("127.0.0.1")
        .port(closed_port())
        .security(Security::None)
        .timeout(Duration::from_secs(2))
        .build();

    let mut transport = SmtpTransport::new();
    let err = transport.connect(&config, &login()).unwrap_err();

    assert!(err.is_connection(), "unexpected error: {err:?}");
    assert!(matches!(err, Error::Connection { ref endpoint, .. } if endpoint == &config.endpoint()));
    assert!(!transport.is_connected());
}

#[test]
fn test_failed_connect_leaves_transport_disconnected() {
    init_tracing();

    let config = Config::builder("127.0.0.1")
        .port(closed_port())
        .security(Security::None)
        .timeout(Duration::from_secs(2))
        .build();

    let mut transport = SmtpTransport::new();
    assert!(transport.connect(&config, &login()).is_err());

    // Logging out of a session that never opened must not raise.
    assert!(transport.disconnect().is_ok());
}

#[test]
fn test_full_session() {
    init_tracing();
    let server = ScriptedServer::start(&[Script::Accept]);

    let mut transport = SmtpTransport::new();
    transport.connect(&server.config(), &login()).unwrap();
    assert!(transport.is_connected());

    transport.send(&envelope(), MESSAGE).unwrap();
    transport.disconnect().unwrap();

    assert!(!transport.is_connected());
    assert_eq!(server.connections(), 1);
}

#[test]
fn test_server_closing_mid_send_is_connection_class() {
    init_tracing();
    let server = ScriptedServer::start(&[Script::DropOnMail, Script::Accept]);
    let config = server.config();

    let mut transport = SmtpTransport::new();
    transport.connect(&config, &login()).unwrap();
    let err = transport.send(&envelope(), MESSAGE).unwrap_err();

    assert!(err.is_connection(), "unexpected error: {err:?}");
    assert!(!transport.is_connected());

    // A fresh session recovers.
    transport.connect(&config, &login()).unwrap();
    transport.send(&envelope(), MESSAGE).unwrap();
    assert_eq!(server.connections(), 2);
}

#[test]
fn test_service_closing_reply_is_connection_class() {
    init_tracing();
    let server = ScriptedServer::start(&[Script::CloseOnMail]);

    let mut transport = SmtpTransport::new();
    transport.connect(&server.config(), &login()).unwrap();
    let err = transport.send(&envelope(), MESSAGE).unwrap_err();

    assert!(err.is_connection(), "unexpected error: {err:?}");
    assert!(!transport.is_connected());
}

#[test]
fn test_rejected_recipient_is_not_connection_class() {
    init_tracing();
    let server = ScriptedServer::start(&[Script::RejectRecipient]);

    let mut transport = SmtpTransport::new();
    transport.connect(&server.config(), &login()).unwrap();
    let err = transport.send(&envelope(), MESSAGE).unwrap_err();

    assert!(matches!(err, Error::Rejected(_)), "unexpected error: {err:?}");
    assert!(!err.is_connection());
}

#[test]
fn test_refused_quit_is_reported() {
    init_tracing();
    let server = ScriptedServer::start(&[Script::RefuseQuit]);

    let mut transport = SmtpTransport::new();
    transport.connect(&server.config(), &login()).unwrap();
    let err = transport.disconnect().unwrap_err();

    assert!(matches!(err, Error::Protocol(_)), "unexpected error: {err:?}");
    assert!(!err.is_connection());
    assert!(!transport.is_connected());
}
