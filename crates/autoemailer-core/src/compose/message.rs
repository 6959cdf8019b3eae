//! Message model and builder.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use lettre::Address;
use tracing::debug;

use super::template::{TemplateArgs, load_template, render_template};
use super::{ComposeError, ComposeResult};

/// A file attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    filename: String,
    content: Vec<u8>,
}

impl Attachment {
    /// Creates an attachment from in-memory content.
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }

    /// Reads a file into an attachment named after the path's last segment.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::AttachmentNotFound`] if the path does not
    /// exist and [`ComposeError::AttachmentRead`] for other read failures.
    pub fn from_path(path: &Path) -> ComposeResult<Self> {
        let content = std::fs::read(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ComposeError::AttachmentNotFound(path.to_path_buf())
            } else {
                ComposeError::AttachmentRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let filename = path
            .file_name()
            .map_or_else(|| "attachment".to_string(), |name| name.to_string_lossy().into_owned());

        debug!("Attached {} ({} bytes)", filename, content.len());
        Ok(Self { filename, content })
    }

    /// File name sent in the `Content-Disposition` header.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Raw file content.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// A composed message, ready to be sent.
///
/// Built fresh for every send with [`MessageBuilder`]; the date is fixed when
/// the message is built.
#[derive(Debug, Clone)]
pub struct Message {
    pub(super) from: String,
    pub(super) to: Vec<String>,
    pub(super) subject: String,
    pub(super) date: DateTime<Utc>,
    pub(super) body: String,
    pub(super) attachments: Vec<Attachment>,
}

impl Message {
    /// Starts a message from `from`.
    pub fn builder(from: impl Into<String>) -> MessageBuilder {
        MessageBuilder::new(from)
    }

    /// Sender address.
    #[must_use]
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Recipient addresses, in the order given.
    #[must_use]
    pub fn to(&self) -> &[String] {
        &self.to
    }

    /// Subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Composition time.
    #[must_use]
    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Composition time as an RFC 2822 `Date` value.
    #[must_use]
    pub fn date_rfc2822(&self) -> String {
        self.date.to_rfc2822()
    }

    /// Plain-text body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Attached files.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }
}

/// Builder for [`Message`].
///
/// Nothing is read from disk until [`MessageBuilder::build`].
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    from: String,
    to: Vec<String>,
    subject: String,
    body: Option<String>,
    template: Option<(PathBuf, TemplateArgs)>,
    attachments: Vec<PathBuf>,
}

impl MessageBuilder {
    /// Creates a builder for a message from `from`.
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: Vec::new(),
            subject: String::new(),
            body: None,
            template: None,
            attachments: Vec::new(),
        }
    }

    /// Adds a recipient.
    #[must_use]
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Adds several recipients.
    #[must_use]
    pub fn to_many<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.to.extend(addresses.into_iter().map(Into::into));
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Sets a literal body. Ignored if a template is set.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Renders the body from a template file.
    #[must_use]
    pub fn template(mut self, path: impl Into<PathBuf>, args: TemplateArgs) -> Self {
        self.template = Some((path.into(), args));
        self
    }

    /// Attaches a file.
    #[must_use]
    pub fn attach(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachments.push(path.into());
        self
    }

    /// Validates addresses, renders the body and reads attachments.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::NoRecipients`] or
    /// [`ComposeError::InvalidAddress`] for bad addresses, a template error
    /// if the template cannot be read or rendered, and an attachment error
    /// for the first attachment that cannot be read.
    pub fn build(self) -> ComposeResult<Message> {
        if self.to.is_empty() {
            return Err(ComposeError::NoRecipients);
        }
        check_address(&self.from)?;
        for address in &self.to {
            check_address(address)?;
        }

        let body = match self.template {
            Some((path, args)) => render_template(&load_template(&path)?, &args)?,
            None => self.body.unwrap_or_default(),
        };

        let attachments = self
            .attachments
            .iter()
            .map(|path| Attachment::from_path(path))
            .collect::<ComposeResult<Vec<_>>>()?;

        Ok(Message {
            from: self.from,
            to: self.to,
            subject: self.subject,
            date: Utc::now(),
            body,
            attachments,
        })
    }
}

fn check_address(address: &str) -> ComposeResult<()> {
    address
        .parse::<Address>()
        .map(|_| ())
        .map_err(|e| ComposeError::InvalidAddress(format!("{address}: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_literal_body() {
        let message = Message::builder("me@gmail.com")
            .to("you@example.org")
            .to_many(["a@example.org", "a@example.org"])
            .subject("Hello")
            .body("Hi there")
            .build()
            .unwrap();

        assert_eq!(message.from(), "me@gmail.com");
        assert_eq!(message.to(), ["you@example.org", "a@example.org", "a@example.org"]);
        assert_eq!(message.subject(), "Hello");
        assert_eq!(message.body(), "Hi there");
        assert!(message.attachments().is_empty());
    }

    #[test]
    fn test_template_body_wins() {
        let mut template = NamedTempFile::new().unwrap();
        write!(template, "Dear {{name}},\nthanks.").unwrap();

        let args = TemplateArgs::from([("name".to_string(), "Ada".to_string())]);
        let message = Message::builder("me@gmail.com")
            .to("you@example.org")
            .body("ignored")
            .template(template.path(), args)
            .build()
            .unwrap();

        assert_eq!(message.body(), "Dear Ada,\nthanks.");
    }

    #[test]
    fn test_missing_template_argument() {
        let mut template = NamedTempFile::new().unwrap();
        write!(template, "Dear {{name}}").unwrap();

        let err = Message::builder("me@gmail.com")
            .to("you@example.org")
            .template(template.path(), TemplateArgs::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, ComposeError::TemplateRender(_)));
    }

    #[test]
    fn test_attachment_named_after_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let message = Message::builder("me@gmail.com")
            .to("you@example.org")
            .attach(&path)
            .build()
            .unwrap();

        let attachment = &message.attachments()[0];
        assert_eq!(attachment.filename(), "report.pdf");
        assert_eq!(attachment.content(), b"%PDF-1.4");
    }

    #[test]
    fn test_missing_attachment() {
        let err = Message::builder("me@gmail.com")
            .to("you@example.org")
            .attach("/missing/file")
            .build()
            .unwrap_err();
        assert!(
            matches!(err, ComposeError::AttachmentNotFound(ref path) if path == Path::new("/missing/file"))
        );
        assert!(err.to_string().contains("/missing/file"));
    }

    #[test]
    fn test_requires_recipient() {
        let err = Message::builder("me@gmail.com").build().unwrap_err();
        assert!(matches!(err, ComposeError::NoRecipients));
    }

    #[test]
    fn test_invalid_addresses() {
        let err = Message::builder("me@gmail.com")
            .to("not an address")
            .build()
            .unwrap_err();
        assert!(matches!(err, ComposeError::InvalidAddress(ref a) if a.starts_with("not an address")));

        let err = Message::builder("nobody").to("you@example.org").build().unwrap_err();
        assert!(matches!(err, ComposeError::InvalidAddress(_)));
    }

    #[test]
    fn test_date_set_at_build() {
        let before = Utc::now();
        let message = Message::builder("me@gmail.com")
            .to("you@example.org")
            .build()
            .unwrap();
        assert!(message.date() >= before && message.date() <= Utc::now());
        assert!(message.date_rfc2822().ends_with("+0000"));
    }
}
