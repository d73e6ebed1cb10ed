//! Canonical filter document schemas.
//!
//! Each schema is a flat struct whose serialized keys are payload paths and
//! whose values are [`FilterExpr`]s. Empty expressions are left out of the
//! serialized document.

use serde::{Deserialize, Serialize};

use crate::expression::FilterExpr;

/// Define a canonical schema struct with its payload-path keys.
macro_rules! canonical_schema {
    (
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident => $key:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                #[serde(rename = $key, skip_serializing_if = "FilterExpr::is_empty")]
                pub $field: FilterExpr,
            )*
        }
    };
}

canonical_schema!(
    /// EUR build results.
    EurBuildFilter {
        /// Build status.
        status => "Body.Status",
        /// Project owner.
        owner => "Body.Owner",
        /// Project name.
        project => "Body.ProjectName",
        /// Event time window.
        time => "Time",
    }
);

canonical_schema!(
    /// Gitee issue events.
    GiteeIssueFilter {
        /// Repository full path.
        repo_name => "IssueEvent.Repository.FullName",
        /// Sig owning the repository.
        sig => "SigGroupName",
        /// Issue state.
        state => "IssueEvent.Issue.State",
        /// Issue author.
        creator => "IssueEvent.Issue.User.Login",
        /// Issue assignee.
        assignee => "IssueEvent.Issue.Assignee.Login",
        /// Acting account, used for bot filtering.
        sender => "IssueEvent.Sender.Login",
        my_sig => "MySig",
        other_sig => "OtherSig",
        my_management => "MyManagement",
        other_management => "OtherManagement",
        /// Event time window.
        time => "Time",
    }
);

canonical_schema!(
    /// Gitee comment events.
    GiteeNoteFilter {
        /// Repository full path.
        repo_name => "NoteEvent.Repository.FullName",
        /// Sig owning the repository.
        sig => "SigGroupName",
        /// Kind of object commented on.
        note_type => "NoteEvent.NoteableType",
        /// Comment author.
        creator => "NoteEvent.Comment.User.Login",
        /// Acting account, used for bot filtering.
        sender => "NoteEvent.Sender.Login",
        my_sig => "MySig",
        other_sig => "OtherSig",
        my_management => "MyManagement",
        other_management => "OtherManagement",
        /// Event time window.
        time => "Time",
    }
);

canonical_schema!(
    /// Gitee pull request events.
    GiteePullRequestFilter {
        /// Repository full path.
        repo_name => "PullRequestEvent.Repository.FullName",
        /// Sig owning the repository.
        sig => "SigGroupName",
        /// Pull request state.
        state => "PullRequestEvent.PullRequest.State",
        /// Pull request author.
        creator => "PullRequestEvent.PullRequest.User.Login",
        /// Pull request assignee.
        assignee => "PullRequestEvent.PullRequest.Assignee.Login",
        /// Acting account, used for bot filtering.
        sender => "PullRequestEvent.Sender.Login",
        my_sig => "MySig",
        other_sig => "OtherSig",
        my_management => "MyManagement",
        other_management => "OtherManagement",
        /// Event time window.
        time => "Time",
    }
);

canonical_schema!(
    /// Gitee push events.
    GiteePushFilter {
        /// Repository full path.
        repo_name => "PushEvent.Repository.FullName",
        /// Sig owning the repository.
        sig => "SigGroupName",
        /// Pushed ref.
        git_ref => "PushEvent.Ref",
        /// Acting account, used for bot filtering.
        sender => "PushEvent.Sender.Login",
        my_sig => "MySig",
        other_sig => "OtherSig",
        my_management => "MyManagement",
        other_management => "OtherManagement",
        /// Event time window.
        time => "Time",
    }
);

canonical_schema!(
    /// Gitee event types that have no schema yet.
    UnmodeledFilter {}
);

canonical_schema!(
    /// Meeting notices.
    MeetingFilter {
        /// Hosting sig.
        sig => "MeetingEvent.Group",
        /// Create/update/delete.
        action => "MeetingEvent.Action",
        /// Meeting start window.
        start_time => "MeetingEvent.StartTime",
        my_sig => "MySig",
        other_sig => "OtherSig",
        /// Event time window.
        time => "Time",
    }
);

canonical_schema!(
    /// CVE advisories.
    CveFilter {
        /// Affected component, substring match.
        component => "CVEEvent.Component",
        /// Affected version, substring match.
        affected_version => "CVEEvent.AffectedVersion",
        /// Advisory state.
        state => "CVEEvent.State",
        /// Responsible sig.
        sig => "CVEEvent.SigName",
        /// Repository the advisory was filed against.
        repo_name => "CVEEvent.Repository",
        /// Event time window.
        time => "Time",
    }
);

/// A compiled filter document, one variant per schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CanonicalFilter {
    EurBuild(EurBuildFilter),
    GiteeIssue(GiteeIssueFilter),
    GiteeNote(GiteeNoteFilter),
    GiteePullRequest(GiteePullRequestFilter),
    GiteePush(GiteePushFilter),
    GiteeUnmodeled(UnmodeledFilter),
    Meeting(MeetingFilter),
    Cve(CveFilter),
}

impl CanonicalFilter {
    /// Serialize to the flat JSON document stored with the subscription.
    pub fn to_document(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Whether no field is constrained (the document matches every event).
    pub fn is_unconstrained(&self) -> bool {
        self.to_document()
            .ok()
            .and_then(|doc| doc.as_object().map(|m| m.is_empty()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::build_set_filter;

    #[test]
    fn test_empty_fields_are_omitted() {
        let filter = CanonicalFilter::GiteeIssue(GiteeIssueFilter {
            state: build_set_filter(&["open"]),
            ..Default::default()
        });
        assert_eq!(
            filter.to_document().unwrap(),
            serde_json::json!({ "IssueEvent.Issue.State": "eq=open" })
        );
        assert!(!filter.is_unconstrained());
    }

    #[test]
    fn test_document_roundtrips_into_schema() {
        let doc = serde_json::json!({ "CVEEvent.State": "oneof=open fixed" });
        let parsed: CveFilter = serde_json::from_value(doc).unwrap();
        assert_eq!(parsed.state, "oneof=open fixed");
        assert!(parsed.component.is_empty());
    }

    #[test]
    fn test_unmodeled_is_empty_object() {
        let filter = CanonicalFilter::GiteeUnmodeled(UnmodeledFilter::default());
        assert_eq!(filter.to_document().unwrap(), serde_json::json!({}));
        assert!(filter.is_unconstrained());
    }
}
