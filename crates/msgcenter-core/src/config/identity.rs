//! Secondary identity (user service) configuration.

use serde::{Deserialize, Serialize};

/// Settings for the external user service that maps internal user ids
/// to code-hosting logins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Base URL of the user service, e.g. `https://users.example.org/api/v1`.
    #[serde(default)]
    pub base_url: String,
    /// Optional bearer token sent with every lookup.
    #[serde(default)]
    pub token: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}
