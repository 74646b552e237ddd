//! Client configuration loaded from the environment.
//!
//! - `WALLET_API_URL`: API base URL (default `https://wallet-api.urbanairship.com/v1`)
//! - `WALLET_API_USER`: account user name
//! - `WALLET_API_KEY` (SENSITIVE): API key, never logged
//! - `WALLET_API_REVISION`: value of the `Api-Revision` header (default `1.2`)
//!
//! Credentials are only applied when both the user and the key are set.

use envconfig::Envconfig;

use crate::error::{ApiError, Result};

pub const DEFAULT_BASE_URL: &str = "https://wallet-api.urbanairship.com/v1";
pub const DEFAULT_API_REVISION: &str = "1.2";

#[derive(Envconfig, Clone)]
pub struct ClientConfig {
    #[envconfig(from = "WALLET_API_URL", default = "https://wallet-api.urbanairship.com/v1")]
    pub base_url: String,

    #[envconfig(from = "WALLET_API_USER")]
    pub username: Option<String>,

    #[envconfig(from = "WALLET_API_KEY")]
    pub api_key: Option<String>,

    #[envconfig(from = "WALLET_API_REVISION", default = "1.2")]
    pub api_revision: String,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Self::init_from_env().map_err(|e| ApiError::Config(e.to_string()))
    }

    /// `(username, api_key)` when both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.api_key.as_deref()) {
            (Some(user), Some(key)) if !user.is_empty() && !key.is_empty() => Some((user, key)),
            _ => None,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: None,
            api_key: None,
            api_revision: DEFAULT_API_REVISION.to_string(),
        }
    }
}

// Keeps the key out of logs and panic messages.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_revision", &self.api_revision)
            .finish()
    }
}
