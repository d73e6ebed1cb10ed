//! `(source, event type)` dispatch keys.

use std::fmt;

use msgcenter_core::result::AppResult;
use msgcenter_entity::event::EventSource;

/// Every `(source, event type)` pair with a canonical schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// EUR package build results.
    EurBuild,
    /// Gitee issue events.
    GiteeIssue,
    /// Gitee comment events.
    GiteeNote,
    /// Gitee pull request events.
    GiteePullRequest,
    /// Gitee push events.
    GiteePush,
    /// A Gitee event type with no schema yet; compiles to an empty document.
    GiteeUnmodeled(String),
    /// Meeting notices.
    Meeting,
    /// CVE advisories.
    Cve,
}

impl FilterKind {
    /// Resolve the kind for a raw `(source, event type)` pair.
    ///
    /// An unknown source is an error; an unknown Gitee event type is not.
    pub fn resolve(source: &str, event_type: &str) -> AppResult<Self> {
        let kind = match EventSource::parse(source)? {
            EventSource::Eur => Self::EurBuild,
            EventSource::Meeting => Self::Meeting,
            EventSource::Cve => Self::Cve,
            EventSource::Gitee => {
                let normalized = event_type.trim().to_ascii_lowercase();
                match normalized.as_str() {
                    "issue" | "issues" => Self::GiteeIssue,
                    "note" | "comment" => Self::GiteeNote,
                    "pr" | "pull_request" | "pullrequest" => Self::GiteePullRequest,
                    "push" => Self::GiteePush,
                    _ => Self::GiteeUnmodeled(normalized),
                }
            }
        };
        Ok(kind)
    }

    /// The source this kind belongs to.
    pub fn source(&self) -> EventSource {
        match self {
            Self::EurBuild => EventSource::Eur,
            Self::GiteeIssue
            | Self::GiteeNote
            | Self::GiteePullRequest
            | Self::GiteePush
            | Self::GiteeUnmodeled(_) => EventSource::Gitee,
            Self::Meeting => EventSource::Meeting,
            Self::Cve => EventSource::Cve,
        }
    }

    /// Event type stored alongside the subscription.
    pub fn event_type(&self) -> &str {
        match self {
            Self::EurBuild => "build",
            Self::GiteeIssue => "issue",
            Self::GiteeNote => "note",
            Self::GiteePullRequest => "pr",
            Self::GiteePush => "push",
            Self::GiteeUnmodeled(event_type) => event_type,
            Self::Meeting => "meeting",
            Self::Cve => "cve",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.source(), self.event_type())
    }
}
