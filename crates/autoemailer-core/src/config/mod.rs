//! Configuration sources.
//!
//! Credential lookup never reads the process environment directly; it goes
//! through a [`ConfigSource`] so resolution can be exercised with an
//! in-memory [`MapSource`].

mod source;
pub mod vars;

pub use source::{ConfigSource, EnvSource, MapSource};
