//! Conversion of a [`Message`] into a MIME message.

use std::time::SystemTime;

use lettre::message::header::{ContentDisposition, ContentTransferEncoding, ContentType};
use lettre::message::{Body, Mailbox, MultiPart, SinglePart};

use super::message::{Attachment, Message};
use super::{ComposeError, ComposeResult};

const OCTET_STREAM: &str = "application/octet-stream";

impl Message {
    /// Builds the `multipart/mixed` MIME message: a plain-text part followed
    /// by one base64 part per attachment.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::InvalidAddress`] or [`ComposeError::Build`] if
    /// the message cannot be assembled.
    pub fn to_lettre(&self) -> ComposeResult<lettre::Message> {
        let mut builder = lettre::Message::builder()
            .from(mailbox(&self.from)?)
            .subject(self.subject.as_str())
            .date(SystemTime::from(self.date));
        for address in &self.to {
            builder = builder.to(mailbox(address)?);
        }

        let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(self.body.clone()));
        for attachment in &self.attachments {
            parts = parts.singlepart(attachment_part(attachment)?);
        }

        builder
            .multipart(parts)
            .map_err(|e| ComposeError::Build(e.to_string()))
    }
}

fn mailbox(address: &str) -> ComposeResult<Mailbox> {
    address
        .parse::<Mailbox>()
        .map_err(|e| ComposeError::InvalidAddress(format!("{address}: {e}")))
}

fn attachment_part(attachment: &Attachment) -> ComposeResult<SinglePart> {
    let content_type =
        ContentType::parse(OCTET_STREAM).map_err(|e| ComposeError::Build(e.to_string()))?;
    let body = Body::new_with_encoding(
        attachment.content().to_vec(),
        ContentTransferEncoding::Base64,
    )
    .map_err(|_| ComposeError::Build(format!("cannot encode {}", attachment.filename())))?;

    Ok(SinglePart::builder()
        .header(content_type)
        .header(ContentDisposition::attachment(attachment.filename()))
        .body(body))
}
