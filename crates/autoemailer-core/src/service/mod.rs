//! Mail dispatch.
//!
//! [`Mailer`] owns one credential set and one transport session, and applies
//! the reconnect-once policy on dropped connections.

mod mailer;

pub use mailer::{Mailer, MailerBuilder};
