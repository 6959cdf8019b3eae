//! Filling in ports and hosts the caller left out.

use tracing::debug;

use super::error::{CredentialError, CredentialResult};
use super::model::CredentialInfo;

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 587;

/// Known submission hosts, keyed by email domain.
///
/// A sender matches an entry when its domain equals the key or is a
/// subdomain of it.
pub const HOST_TABLE: &[(&str, &str)] = &[
    ("outlook.com", "smtp.office365.com"),
    ("hotmail.com", "smtp.office365.com"),
    ("live.com", "smtp.office365.com"),
    ("gmail.com", "smtp.gmail.com"),
    ("googlemail.com", "smtp.gmail.com"),
    ("yahoo.com", "smtp.mail.yahoo.com"),
    ("ymail.com", "smtp.mail.yahoo.com"),
    ("icloud.com", "smtp.mail.me.com"),
    ("me.com", "smtp.mail.me.com"),
    ("mac.com", "smtp.mail.me.com"),
];

/// Looks up the SMTP host for a sender address.
///
/// Returns `None` if the address has no domain or the domain is not in
/// [`HOST_TABLE`].
#[must_use]
pub fn infer_host(address: &str) -> Option<&'static str> {
    let (_, domain) = address.trim().rsplit_once('@')?;
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        return None;
    }

    HOST_TABLE
        .iter()
        .find(|(suffix, _)| {
            domain == *suffix
                || domain
                    .strip_suffix(suffix)
                    .is_some_and(|rest| rest.ends_with('.'))
        })
        .map(|(_, host)| *host)
}

/// Parses a port value as found in a file or environment variable.
///
/// Blank input means "unset".
///
/// # Errors
///
/// Returns [`CredentialError::InvalidPort`] if the value is not 1-65535.
pub fn parse_port(raw: &str) -> CredentialResult<Option<u16>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<u16>() {
        Ok(port) if port != 0 => Ok(Some(port)),
        _ => Err(CredentialError::InvalidPort {
            value: raw.to_string(),
        }),
    }
}

/// Defaults the port and infers the host.
///
/// An empty `info` is returned unchanged so that "no data" can be told apart
/// from "bad data" by whoever validates the result. Sender and password are
/// not checked here.
///
/// # Errors
///
/// Returns [`CredentialError::HostInference`] if the host is missing and the
/// sender's domain is not in [`HOST_TABLE`].
pub fn fill_missing(mut info: CredentialInfo) -> CredentialResult<CredentialInfo> {
    if info.is_empty() {
        return Ok(info);
    }

    if info.port.is_none() {
        info.port = Some(DEFAULT_PORT);
    }

    if info.host.as_deref().is_none_or(|host| host.trim().is_empty()) {
        let address = info.sender.as_deref().unwrap_or_default();
        let host = infer_host(address).ok_or_else(|| CredentialError::HostInference {
            address: address.to_string(),
        })?;
        debug!("Inferred SMTP host {host} for {address}");
        info.host = Some(host.to_string());
    }

    Ok(info)
}
