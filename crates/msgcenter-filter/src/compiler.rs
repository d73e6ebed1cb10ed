//! Subscription filter compiler.
//!
//! [`compile`] resolves the [`FilterKind`] for the request and then
//! assembles the matching schema. Every schema field comes from exactly one
//! expression builder call, so adding a field means one schema line plus
//! one builder call here.

use tracing::debug;

use msgcenter_core::result::AppResult;

use crate::expression::{
    build_bot_filter, build_contains_any, build_contains_filter, build_membership_filter,
    build_repo_filter, build_set_filter, build_time_range_filter, split_values,
};
use crate::kind::FilterKind;
use crate::request::SubscribeRequest;
use crate::schema::{
    CanonicalFilter, CveFilter, EurBuildFilter, GiteeIssueFilter, GiteeNoteFilter,
    GiteePullRequestFilter, GiteePushFilter, MeetingFilter, UnmodeledFilter,
};

/// Schema version recorded when the request does not name one.
pub const DEFAULT_SPEC_VERSION: &str = "1.0";

/// Result of compiling a subscription request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFilter {
    /// Resolved `(source, event type)`.
    pub kind: FilterKind,
    /// Schema version to store.
    pub spec_version: String,
    /// The canonical document.
    pub filter: CanonicalFilter,
}

/// Compile a raw request into its canonical filter.
///
/// Fails only when the source is not supported.
pub fn compile(request: &SubscribeRequest) -> AppResult<CompiledFilter> {
    let kind = FilterKind::resolve(&request.source, &request.event_type)?;
    let filter = compile_kind(&kind, request);

    debug!(kind = %kind, filter = ?filter, "Compiled subscription filter");

    let spec_version = request
        .spec_version
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_SPEC_VERSION)
        .to_string();

    Ok(CompiledFilter {
        kind,
        spec_version,
        filter,
    })
}

fn compile_kind(kind: &FilterKind, req: &SubscribeRequest) -> CanonicalFilter {
    match kind {
        FilterKind::EurBuild => CanonicalFilter::EurBuild(eur_build(req)),
        FilterKind::GiteeIssue => CanonicalFilter::GiteeIssue(gitee_issue(req)),
        FilterKind::GiteeNote => CanonicalFilter::GiteeNote(gitee_note(req)),
        FilterKind::GiteePullRequest => CanonicalFilter::GiteePullRequest(gitee_pull_request(req)),
        FilterKind::GiteePush => CanonicalFilter::GiteePush(gitee_push(req)),
        FilterKind::GiteeUnmodeled(event_type) => {
            debug!(event_type = %event_type, "No schema for Gitee event type, storing empty filter");
            CanonicalFilter::GiteeUnmodeled(UnmodeledFilter::default())
        }
        FilterKind::Meeting => CanonicalFilter::Meeting(meeting(req)),
        FilterKind::Cve => CanonicalFilter::Cve(cve(req)),
    }
}

fn list(raw: &Option<String>) -> Vec<String> {
    split_values(raw.as_deref())
}

fn eur_build(req: &SubscribeRequest) -> EurBuildFilter {
    EurBuildFilter {
        status: build_set_filter(&list(&req.build_status)),
        owner: build_set_filter(&list(&req.build_owner)),
        project: build_set_filter(&list(&req.build_project)),
        time: build_time_range_filter(req.start_time, req.end_time),
    }
}

fn gitee_issue(req: &SubscribeRequest) -> GiteeIssueFilter {
    let (my_sig, other_sig) = build_membership_filter(req.my_sig.as_deref(), req.other_sig.as_deref());
    let (my_management, other_management) =
        build_membership_filter(req.my_management.as_deref(), req.other_management.as_deref());

    GiteeIssueFilter {
        repo_name: build_repo_filter(&list(&req.repos)),
        sig: build_set_filter(&list(&req.sigs)),
        state: build_set_filter(&list(&req.issue_state)),
        creator: build_set_filter(&list(&req.issue_creator)),
        assignee: build_set_filter(&list(&req.issue_assignee)),
        sender: build_bot_filter(req.is_bot),
        my_sig,
        other_sig,
        my_management,
        other_management,
        time: build_time_range_filter(req.start_time, req.end_time),
    }
}

fn gitee_note(req: &SubscribeRequest) -> GiteeNoteFilter {
    let (my_sig, other_sig) = build_membership_filter(req.my_sig.as_deref(), req.other_sig.as_deref());
    let (my_management, other_management) =
        build_membership_filter(req.my_management.as_deref(), req.other_management.as_deref());

    GiteeNoteFilter {
        repo_name: build_repo_filter(&list(&req.repos)),
        sig: build_set_filter(&list(&req.sigs)),
        note_type: build_set_filter(&list(&req.note_type)),
        creator: build_set_filter(&list(&req.note_creator)),
        sender: build_bot_filter(req.is_bot),
        my_sig,
        other_sig,
        my_management,
        other_management,
        time: build_time_range_filter(req.start_time, req.end_time),
    }
}

fn gitee_pull_request(req: &SubscribeRequest) -> GiteePullRequestFilter {
    let (my_sig, other_sig) = build_membership_filter(req.my_sig.as_deref(), req.other_sig.as_deref());
    let (my_management, other_management) =
        build_membership_filter(req.my_management.as_deref(), req.other_management.as_deref());

    GiteePullRequestFilter {
        repo_name: build_repo_filter(&list(&req.repos)),
        sig: build_set_filter(&list(&req.sigs)),
        state: build_set_filter(&list(&req.pr_state)),
        creator: build_set_filter(&list(&req.pr_creator)),
        assignee: build_set_filter(&list(&req.pr_assignee)),
        sender: build_bot_filter(req.is_bot),
        my_sig,
        other_sig,
        my_management,
        other_management,
        time: build_time_range_filter(req.start_time, req.end_time),
    }
}

fn gitee_push(req: &SubscribeRequest) -> GiteePushFilter {
    let (my_sig, other_sig) = build_membership_filter(req.my_sig.as_deref(), req.other_sig.as_deref());
    let (my_management, other_management) =
        build_membership_filter(req.my_management.as_deref(), req.other_management.as_deref());

    GiteePushFilter {
        repo_name: build_repo_filter(&list(&req.repos)),
        sig: build_set_filter(&list(&req.sigs)),
        git_ref: build_set_filter(&list(&req.push_ref)),
        sender: build_bot_filter(req.is_bot),
        my_sig,
        other_sig,
        my_management,
        other_management,
        time: build_time_range_filter(req.start_time, req.end_time),
    }
}

fn meeting(req: &SubscribeRequest) -> MeetingFilter {
    let (my_sig, other_sig) = build_membership_filter(req.my_sig.as_deref(), req.other_sig.as_deref());

    MeetingFilter {
        sig: build_set_filter(&list(&req.sigs)),
        action: build_set_filter(&list(&req.meeting_action)),
        start_time: build_time_range_filter(req.meeting_start_time, req.meeting_end_time),
        my_sig,
        other_sig,
        time: build_time_range_filter(req.start_time, req.end_time),
    }
}

fn cve(req: &SubscribeRequest) -> CveFilter {
    CveFilter {
        component: build_contains_any(&list(&req.cve_component)),
        affected_version: build_contains_filter(&list(&req.cve_affected)),
        state: build_set_filter(&list(&req.cve_state)),
        sig: build_set_filter(&list(&req.sigs)),
        repo_name: build_set_filter(&list(&req.repos)),
        time: build_time_range_filter(req.start_time, req.end_time),
    }
}
