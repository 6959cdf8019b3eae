//! JSON credential files.
//!
//! A credential file is a flat JSON object:
//!
//! ```json
//! {
//!     "sender": "me@gmail.com",
//!     "password": "app-password",
//!     "host": "",
//!     "port": 587
//! }
//! ```
//!
//! All four keys must be present. `host` and `port` may be empty or `null`
//! to have them filled in; `port` may be a number or a numeric string. The
//! `emailer_`-prefixed spelling of each key is accepted too.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use super::error::{CredentialError, CredentialResult};
use super::model::CredentialInfo;
use super::resolve::parse_port;

/// Keys every credential file must contain.
const REQUIRED_KEYS: [&str; 4] = ["sender", "password", "host", "port"];

/// Legacy key prefix.
const KEY_PREFIX: &str = "emailer_";

/// Reads a credential file into partial credentials.
///
/// # Errors
///
/// Returns [`CredentialError::InvalidCredentialFile`] if the file cannot be
/// read, is not a JSON object, is missing keys, or has non-scalar values,
/// and [`CredentialError::InvalidPort`] for an unusable port.
pub fn load_credential_file(path: &Path) -> CredentialResult<CredentialInfo> {
    debug!("Loading credentials from {}", path.display());

    let fail = |reason: String| CredentialError::InvalidCredentialFile {
        path: path.to_path_buf(),
        reason,
    };

    let text = std::fs::read_to_string(path).map_err(|e| fail(format!("cannot read file: {e}")))?;
    let record: Map<String, Value> =
        serde_json::from_str(&text).map_err(|e| fail(format!("not a valid JSON object: {e}")))?;

    let lookup = |key: &str| {
        record
            .get(key)
            .or_else(|| record.get(&format!("{KEY_PREFIX}{key}")))
    };

    let missing: Vec<&str> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|key| match *key {
            // Sender and password must also have a value.
            "sender" | "password" => lookup(key).and_then(text_value).is_none(),
            _ => lookup(key).is_none(),
        })
        .collect();
    if !missing.is_empty() {
        return Err(fail(format!("missing fields {}", missing.join(", "))));
    }

    let field = |key: &str| -> CredentialResult<Option<String>> {
        match lookup(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(value) => text_value(value)
                .map(Some)
                .ok_or_else(|| fail(format!("field {key} must be a string or number"))),
        }
    };

    Ok(CredentialInfo {
        sender: field("sender")?,
        password: field("password")?,
        host: field("host")?,
        port: match field("port")? {
            Some(raw) => parse_port(&raw)?,
            None => None,
        },
    })
}

/// Renders a scalar as text; empty strings count as absent.
fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
