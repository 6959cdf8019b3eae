//! Environment variables read by the credential provider chain.

/// Prefix shared by every variable below.
///
/// Any variable carrying it signals intent to configure through the
/// environment.
pub const PREFIX: &str = "EMAILER_";

/// Path of a JSON credential file.
pub const CREDENTIALS_PATH: &str = "EMAILER_CREDENTIALS";

/// Sender address, also used as the login username.
pub const SENDER: &str = "EMAILER_SENDER";

/// Account password.
pub const PASSWORD: &str = "EMAILER_PASSWORD";

/// SMTP server host. Inferred from the sender domain when unset.
pub const HOST: &str = "EMAILER_HOST";

/// SMTP server port. Defaults to 587 when unset.
pub const PORT: &str = "EMAILER_PORT";
