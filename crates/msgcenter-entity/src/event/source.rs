//! Upstream event source enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

use msgcenter_core::error::AppError;

/// An upstream system that produces events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    /// EUR package build service.
    Eur,
    /// Gitee code hosting (issues, pull requests, comments, pushes).
    Gitee,
    /// Community meeting scheduler.
    Meeting,
    /// CVE advisory tracker.
    Cve,
}

impl EventSource {
    /// All known sources.
    pub const ALL: [EventSource; 4] = [Self::Eur, Self::Gitee, Self::Meeting, Self::Cve];

    /// Short tag stored in the `source` columns.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eur => "eur",
            Self::Gitee => "gitee",
            Self::Meeting => "meeting",
            Self::Cve => "cve",
        }
    }

    /// Upstream URI the ingester may use instead of the short tag.
    pub fn uri(&self) -> &'static str {
        match self {
            Self::Eur => "https://eur.openeuler.openatom.cn",
            Self::Gitee => "https://gitee.com",
            Self::Meeting => "https://www.openeuler.org/meeting",
            Self::Cve => "https://cve.openeuler.org",
        }
    }

    /// Parse a source tag or URI.
    ///
    /// Anything outside the known set is an
    /// [`ErrorKind::UnsupportedSource`](msgcenter_core::error::ErrorKind::UnsupportedSource)
    /// error.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let normalized = raw.trim().trim_end_matches('/').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|s| normalized == s.as_str() || normalized == s.uri())
            .ok_or_else(|| AppError::unsupported_source(raw))
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
