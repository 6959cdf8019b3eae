//! Ordered credential sources.

use std::fmt;

use tracing::debug;

use super::error::{CredentialError, CredentialResult};
use super::model::{CredentialInfo, CredentialSet};
use super::resolve::parse_port;
use crate::config::{ConfigSource, EnvSource, vars};

/// A single place credentials may come from.
pub trait CredentialProvider {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Produces credentials, or `Ok(None)` if this source is not configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is configured but unusable. Callers
    /// must not fall through to another source in that case.
    fn provide(&self) -> CredentialResult<Option<CredentialSet>>;
}

/// Reads the JSON file named by `EMAILER_CREDENTIALS`.
#[derive(Debug, Clone)]
pub struct FileProvider<S> {
    source: S,
}

impl<S: ConfigSource> FileProvider<S> {
    /// Creates a provider over `source`.
    pub const fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: ConfigSource> CredentialProvider for FileProvider<S> {
    fn name(&self) -> &'static str {
        "credential file"
    }

    fn provide(&self) -> CredentialResult<Option<CredentialSet>> {
        let Some(path) = self.source.get(vars::CREDENTIALS_PATH) else {
            debug!("{} is not set", vars::CREDENTIALS_PATH);
            return Ok(None);
        };

        CredentialSet::from_file(path).map(Some)
    }
}

/// Reads the individual `EMAILER_*` variables.
#[derive(Debug, Clone)]
pub struct EnvProvider<S> {
    source: S,
}

impl<S: ConfigSource> EnvProvider<S> {
    /// Creates a provider over `source`.
    pub const fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: ConfigSource> CredentialProvider for EnvProvider<S> {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn provide(&self) -> CredentialResult<Option<CredentialSet>> {
        if !self.source.has_prefix(vars::PREFIX) {
            debug!("No {}* variables set", vars::PREFIX);
            return Ok(None);
        }

        let sender = self.source.get(vars::SENDER);
        let password = self.source.get(vars::PASSWORD);

        let missing: Vec<&'static str> = [(vars::SENDER, sender.is_none()), (vars::PASSWORD, password.is_none())]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
        if !missing.is_empty() {
            return Err(CredentialError::IncompleteEnvironmentCredentials { missing });
        }

        let port = match self.source.get(vars::PORT) {
            Some(raw) => parse_port(&raw)?,
            None => None,
        };

        CredentialSet::from_info(CredentialInfo {
            sender,
            password,
            host: self.source.get(vars::HOST),
            port,
        })
        .map(Some)
    }
}

/// Tries credential providers in order until one yields credentials.
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl ProviderChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard chain: credential file first, then individual variables.
    #[must_use]
    pub fn standard<S>(source: S) -> Self
    where
        S: ConfigSource + Clone + 'static,
    {
        Self::new()
            .with(FileProvider::new(source.clone()))
            .with(EnvProvider::new(source))
    }

    /// Appends a provider.
    #[must_use]
    pub fn with(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Resolves credentials from the first provider that has any.
    ///
    /// # Errors
    ///
    /// Returns the first provider error encountered, or
    /// [`CredentialError::CredentialsNotFound`] if no provider yields data.
    pub fn resolve(&self) -> CredentialResult<CredentialSet> {
        for provider in &self.providers {
            if let Some(credentials) = provider.provide()? {
                debug!(
                    "Using credentials for {} from {}",
                    credentials.sender_email(),
                    provider.name()
                );
                return Ok(credentials);
            }
        }

        Err(CredentialError::CredentialsNotFound {
            path_var: vars::CREDENTIALS_PATH,
            prefix: vars::PREFIX,
        })
    }
}

impl fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.name()))
            .finish()
    }
}

/// Resolves credentials from the process environment with the standard chain.
///
/// # Errors
///
/// See [`ProviderChain::resolve`].
pub fn default_credentials() -> CredentialResult<CredentialSet> {
    ProviderChain::standard(EnvSource).resolve()
}
