//! Credential resolution.
//!
//! A [`CredentialSet`] is produced by a [`ProviderChain`], which tries its
//! sources in order until one yields data:
//!
//! 1. a JSON file named by `EMAILER_CREDENTIALS`
//! 2. the individual `EMAILER_SENDER`/`EMAILER_PASSWORD`/`EMAILER_HOST`/`EMAILER_PORT`
//!    variables
//!
//! Missing ports default to 587 and missing hosts are inferred from the
//! sender's domain (see [`infer_host`]).

mod error;
mod file;
mod model;
mod provider;
mod resolve;

pub use error::{CredentialError, CredentialResult};
pub use file::load_credential_file;
pub use model::{CredentialInfo, CredentialSet};
pub use provider::{
    CredentialProvider, EnvProvider, FileProvider, ProviderChain, default_credentials,
};
pub use resolve::{DEFAULT_PORT, HOST_TABLE, fill_missing, infer_host, parse_port};
