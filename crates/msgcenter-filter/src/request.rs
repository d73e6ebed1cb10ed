//! Raw subscription-creation request.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Every field a user may supply when creating a subscription.
///
/// Most fields only matter for one source and are ignored by the others.
/// List-valued fields are comma-separated strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscribeRequest {
    /// Source tag or URI.
    pub source: String,
    /// Event type; only meaningful for Gitee.
    pub event_type: String,
    /// User-visible subscription name.
    #[validate(length(min = 1, max = 64))]
    pub mode_name: String,
    /// Canonical schema version; defaults when absent.
    pub spec_version: Option<String>,

    /// `namespace/repo` paths, `namespace/*`, or `*`.
    pub repos: Option<String>,
    /// Sig groups (for meetings, the hosting sig).
    pub sigs: Option<String>,
    /// Keep (`true`) or drop (`false`) bot activity.
    pub is_bot: Option<bool>,
    /// Sigs the user belongs to.
    pub my_sig: Option<String>,
    /// Sigs to exclude.
    pub other_sig: Option<String>,
    /// Repositories the user manages.
    pub my_management: Option<String>,
    /// Managed repositories to exclude.
    pub other_management: Option<String>,
    /// Event time lower bound.
    pub start_time: Option<DateTime<FixedOffset>>,
    /// Event time upper bound.
    pub end_time: Option<DateTime<FixedOffset>>,

    /// Issue states (`open`, `progressing`, `closed`, `rejected`).
    pub issue_state: Option<String>,
    /// Issue authors.
    pub issue_creator: Option<String>,
    /// Issue assignees.
    pub issue_assignee: Option<String>,

    /// Pull request states (`open`, `merged`, `closed`).
    pub pr_state: Option<String>,
    /// Pull request authors.
    pub pr_creator: Option<String>,
    /// Pull request assignees.
    pub pr_assignee: Option<String>,

    /// Commented object kinds (`Issue`, `PullRequest`, `Commit`).
    pub note_type: Option<String>,
    /// Comment authors.
    pub note_creator: Option<String>,

    /// Pushed refs, e.g. `refs/heads/master`.
    pub push_ref: Option<String>,

    /// Meeting actions (`create`, `update`, `delete`).
    pub meeting_action: Option<String>,
    /// Meeting start lower bound.
    pub meeting_start_time: Option<DateTime<FixedOffset>>,
    /// Meeting start upper bound.
    pub meeting_end_time: Option<DateTime<FixedOffset>>,

    /// Build statuses.
    pub build_status: Option<String>,
    /// Build owners.
    pub build_owner: Option<String>,
    /// Build projects.
    pub build_project: Option<String>,

    /// Affected components (substring match).
    pub cve_component: Option<String>,
    /// Advisory states.
    pub cve_state: Option<String>,
    /// Affected versions (substring match).
    pub cve_affected: Option<String>,
}
