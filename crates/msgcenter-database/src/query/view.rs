//! Inbox views: which channel scopes make up each inbox variant.

use serde::{Deserialize, Serialize};
use std::fmt;

use msgcenter_core::error::AppError;
use msgcenter_core::result::AppResult;
use msgcenter_core::traits::identity::SecondaryIdentity;
use msgcenter_entity::event::EventSource;
use msgcenter_entity::inbox::Channel;

use super::predicate::{InboxFilter, Predicate, RecipientSelector};
use super::scope::ChannelScope;

/// An inbox variant as requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InboxView {
    /// Followed events, by user id or identity.
    Follow,
    /// Events about the user, by identity.
    Related,
    /// Every to-do row.
    Todo,
    /// To-dos collapsed to the latest row per business id.
    TodoLatest,
    /// Meeting to-dos, collapsed, with an upcoming/past window.
    Meeting,
    /// Follow, related and latest to-dos in one page.
    All,
}

impl InboxView {
    /// All views.
    pub const ALL: [InboxView; 6] = [
        Self::Follow,
        Self::Related,
        Self::Todo,
        Self::TodoLatest,
        Self::Meeting,
        Self::All,
    ];

    /// Stable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Related => "related",
            Self::Todo => "todo",
            Self::TodoLatest => "todo-latest",
            Self::Meeting => "meeting",
            Self::All => "all",
        }
    }

    /// Whether the view cannot produce rows without a secondary identity.
    pub fn needs_identity(&self) -> bool {
        matches!(
            self,
            Self::Related | Self::Todo | Self::TodoLatest | Self::Meeting
        )
    }

    /// Build the channel scopes for this view.
    ///
    /// Returns no scopes when the view needs an identity and there is none;
    /// callers treat that as an empty page. `keys` mean event ids on some
    /// channels and business ids on others, so the `all` view rejects them.
    pub fn scopes(
        &self,
        user_id: &str,
        identity: &SecondaryIdentity,
        filter: &InboxFilter,
    ) -> AppResult<Vec<ChannelScope>> {
        if *self == Self::All && filter.keys.is_some() {
            return Err(AppError::validation(
                "keys are not accepted by the all view; pick a single-channel view",
            ));
        }

        let login = identity.login();
        if self.needs_identity() && login.is_none() {
            return Ok(Vec::new());
        }

        let follow_selector = match login {
            Some(login) => RecipientSelector::Either {
                user_id: user_id.to_string(),
                identity: login.to_string(),
            },
            None => RecipientSelector::UserId(user_id.to_string()),
        };
        let identity_selector = login.map(|l| RecipientSelector::Identity(l.to_string()));

        let scopes = match (self, identity_selector) {
            (Self::Follow, _) => vec![ChannelScope::new(
                Channel::Follow,
                Predicate::compose(Channel::Follow, follow_selector, filter)?,
            )],
            (Self::Related, Some(selector)) => vec![ChannelScope::new(
                Channel::Related,
                Predicate::compose(Channel::Related, selector, filter)?,
            )],
            (Self::Todo, Some(selector)) => vec![ChannelScope::new(
                Channel::Todo,
                Predicate::compose(Channel::Todo, selector, filter)?,
            )],
            (Self::TodoLatest, Some(selector)) => vec![ChannelScope::collapsed(
                Channel::Todo,
                Predicate::compose(Channel::Todo, selector, filter)?,
            )],
            (Self::Meeting, Some(selector)) => {
                let filter = InboxFilter {
                    source: Some(EventSource::Meeting.as_str().to_string()),
                    ..filter.clone()
                };
                vec![ChannelScope::collapsed(
                    Channel::Todo,
                    Predicate::compose(Channel::Todo, selector, &filter)?,
                )]
            }
            (Self::All, selector) => {
                let mut scopes = vec![ChannelScope::new(
                    Channel::Follow,
                    Predicate::compose(Channel::Follow, follow_selector, filter)?,
                )];
                if let Some(selector) = selector {
                    scopes.push(ChannelScope::new(
                        Channel::Related,
                        Predicate::compose(Channel::Related, selector.clone(), filter)?,
                    ));
                    scopes.push(ChannelScope::collapsed(
                        Channel::Todo,
                        Predicate::compose(Channel::Todo, selector, filter)?,
                    ));
                }
                scopes
            }
            (_, None) => Vec::new(),
        };

        Ok(scopes)
    }
}

impl fmt::Display for InboxView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InboxView {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("unknown inbox view '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::predicate::Condition;

    fn known() -> SecondaryIdentity {
        SecondaryIdentity::Known("octo".into())
    }

    #[test]
    fn test_identity_views_short_circuit() {
        for view in InboxView::ALL {
            let scopes = view
                .scopes("u1", &SecondaryIdentity::Absent, &InboxFilter::default())
                .unwrap();
            assert_eq!(scopes.is_empty(), view.needs_identity(), "{view}");
        }
    }

    #[test]
    fn test_follow_matches_either_identity() {
        let scopes = InboxView::Follow
            .scopes("u1", &known(), &InboxFilter::default())
            .unwrap();
        assert_eq!(
            scopes[0].predicate.recipient(),
            &RecipientSelector::Either {
                user_id: "u1".into(),
                identity: "octo".into()
            }
        );

        let scopes = InboxView::Follow
            .scopes("u1", &SecondaryIdentity::Absent, &InboxFilter::default())
            .unwrap();
        assert_eq!(
            scopes[0].predicate.recipient(),
            &RecipientSelector::UserId("u1".into())
        );
    }

    #[test]
    fn test_meeting_forces_source_and_collapses() {
        let filter = InboxFilter {
            source: Some("gitee".into()),
            ..Default::default()
        };
        let scopes = InboxView::Meeting.scopes("u1", &known(), &filter).unwrap();
        assert_eq!(scopes.len(), 1);
        assert!(scopes[0].is_collapsed());
        assert!(scopes[0]
            .predicate
            .conditions()
            .contains(&Condition::Source(EventSource::Meeting)));
    }

    #[test]
    fn test_all_view_channels() {
        let scopes = InboxView::All
            .scopes("u1", &known(), &InboxFilter::default())
            .unwrap();
        let channels: Vec<_> = scopes.iter().map(|s| (s.channel, s.is_collapsed())).collect();
        assert_eq!(
            channels,
            vec![
                (Channel::Follow, false),
                (Channel::Related, false),
                (Channel::Todo, true)
            ]
        );

        let scopes = InboxView::All
            .scopes("u1", &SecondaryIdentity::Absent, &InboxFilter::default())
            .unwrap();
        assert_eq!(scopes.len(), 1);
    }

    #[test]
    fn test_all_view_rejects_keys() {
        let filter = InboxFilter {
            keys: Some(vec!["evt-1".into()]),
            ..Default::default()
        };
        let err = InboxView::All.scopes("u1", &known(), &filter).unwrap_err();
        assert_eq!(err.kind, msgcenter_core::error::ErrorKind::Validation);
        assert!(InboxView::Follow.scopes("u1", &known(), &filter).is_ok());
    }

    #[test]
    fn test_parse_view() {
        assert_eq!("todo-latest".parse::<InboxView>().unwrap(), InboxView::TodoLatest);
        assert!("inbox".parse::<InboxView>().is_err());
    }
}
