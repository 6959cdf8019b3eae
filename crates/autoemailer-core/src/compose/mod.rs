//! Message composition.
//!
//! Builds a multipart message (text body plus attachments) from a subject,
//! recipients and either a literal body or a template. Composition reads
//! local files but never touches the network, so input errors surface before
//! any connection is made.

mod message;
mod mime;
mod template;

use std::path::PathBuf;

pub use message::{Attachment, Message, MessageBuilder};
pub use template::{TemplateArgs, load_template, render_template};

/// Errors raised while composing a message.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// The template file could not be read.
    #[error("Cannot read template {}: {source}", .path.display())]
    TemplateRead {
        /// Template path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The template could not be rendered.
    #[error("Cannot render template: {0}")]
    TemplateRender(String),

    /// An attachment path does not exist.
    #[error("Attachment not found: {}", .0.display())]
    AttachmentNotFound(PathBuf),

    /// An attachment exists but could not be read.
    #[error("Cannot read attachment {}: {source}", .path.display())]
    AttachmentRead {
        /// Attachment path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An address could not be parsed.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// The message has no recipients.
    #[error("At least one recipient is required")]
    NoRecipients,

    /// The MIME message could not be assembled.
    #[error("Failed to build message: {0}")]
    Build(String),
}

/// Result type for composition.
pub type ComposeResult<T> = std::result::Result<T, ComposeError>;
