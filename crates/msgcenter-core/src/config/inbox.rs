//! Inbox query configuration.

use serde::{Deserialize, Serialize};

/// Defaults applied to inbox listing requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxConfig {
    /// Page size used when a request omits `countPerPage`.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> u64 {
    10
}
