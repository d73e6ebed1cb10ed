//! Query predicate composer.
//!
//! A [`Predicate`] is a list of typed [`Condition`]s, each owning its bound
//! values. It renders itself into a [`QueryBuilder`], so placeholders are
//! numbered by the builder and never by hand. The same predicate is rendered
//! into the page query and into the read-state mutation, which is what keeps
//! "what was shown" and "what gets marked" identical.
//!
//! Rendered fragments use fixed aliases: `l` for the channel link table,
//! `e` for `cloud_event`, `r` for `recipient`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};
use tracing::debug;

use msgcenter_core::error::AppError;
use msgcenter_core::result::AppResult;
use msgcenter_entity::event::EventSource;
use msgcenter_entity::inbox::Channel;
use msgcenter_filter::expression::BOT_IDENTITIES;

/// Which recipient rows a query is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientSelector {
    /// Match `recipient.user_id`.
    UserId(String),
    /// Match `recipient.gitee_user_name`.
    Identity(String),
    /// Match either column.
    Either {
        /// Internal user id.
        user_id: String,
        /// Secondary identity.
        identity: String,
    },
}

/// Meeting rollup time filter, relative to the store's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingWindow {
    /// Meetings that have not started yet.
    Upcoming,
    /// Meetings that already started.
    Past,
}

/// Optional filters supplied with an inbox request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InboxFilter {
    /// Restrict to one source (tag or URI).
    pub source: Option<String>,
    /// `None` means read state is not filtered.
    pub is_read: Option<bool>,
    /// To-do channel only.
    pub is_done: Option<bool>,
    /// Keep only (`true`) or drop (`false`) bot activity.
    pub is_bot: Option<bool>,
    /// RFC 3339 lower bound on event time; empty means no bound.
    pub start_time: Option<String>,
    /// Meeting rollup only.
    pub meeting: Option<MeetingWindow>,
    /// Identifying keys (event ids, or business ids on the to-do channel).
    pub keys: Option<Vec<String>>,
}

/// A single typed predicate fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Recipient scoping.
    Recipient(RecipientSelector),
    /// `e.source` is the source's tag or its URI.
    Source(EventSource),
    /// `l.is_read = ?`
    IsRead(bool),
    /// `l.is_done = ?`
    IsDone(bool),
    /// Actor is (or is not) one of the bot identities.
    IsBot(bool),
    /// `e.event_time >= ?`
    Since(DateTime<Utc>),
    /// Meeting deadline before or after now.
    Meeting(MeetingWindow),
    /// `l.event_id = ANY(?)`
    EventIds(Vec<String>),
    /// `l.business_id = ANY(?)`
    BusinessIds(Vec<String>),
}

impl Condition {
    fn push_to(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Self::Recipient(RecipientSelector::UserId(user_id)) => {
                qb.push("r.user_id = ").push_bind(user_id.clone());
            }
            Self::Recipient(RecipientSelector::Identity(identity)) => {
                qb.push("r.gitee_user_name = ").push_bind(identity.clone());
            }
            Self::Recipient(RecipientSelector::Either { user_id, identity }) => {
                qb.push("(r.user_id = ")
                    .push_bind(user_id.clone())
                    .push(" OR r.gitee_user_name = ")
                    .push_bind(identity.clone())
                    .push(")");
            }
            Self::Source(source) => {
                let spellings = vec![source.as_str().to_string(), source.uri().to_string()];
                qb.push("e.source = ANY(").push_bind(spellings).push(")");
            }
            Self::IsRead(is_read) => {
                qb.push("l.is_read = ").push_bind(*is_read);
            }
            Self::IsDone(is_done) => {
                qb.push("l.is_done = ").push_bind(*is_done);
            }
            Self::IsBot(is_bot) => {
                let bots: Vec<String> = BOT_IDENTITIES.iter().map(|b| b.to_string()).collect();
                if *is_bot {
                    qb.push("e.actor = ANY(").push_bind(bots).push(")");
                } else {
                    qb.push("NOT (e.actor = ANY(").push_bind(bots).push("))");
                }
            }
            Self::Since(since) => {
                qb.push("e.event_time >= ").push_bind(*since);
            }
            Self::Meeting(MeetingWindow::Upcoming) => {
                qb.push("l.deadline >= NOW()");
            }
            Self::Meeting(MeetingWindow::Past) => {
                qb.push("l.deadline < NOW()");
            }
            Self::EventIds(ids) => {
                qb.push("l.event_id = ANY(").push_bind(ids.clone()).push(")");
            }
            Self::BusinessIds(ids) => {
                qb.push("l.business_id = ANY(").push_bind(ids.clone()).push(")");
            }
        }
    }
}

/// Conjunction of conditions on top of the "not deleted" base filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    recipient: RecipientSelector,
    conditions: Vec<Condition>,
}

impl Predicate {
    /// A predicate that only scopes by recipient.
    pub fn for_recipient(recipient: RecipientSelector) -> Self {
        Self {
            recipient,
            conditions: Vec::new(),
        }
    }

    /// Add a condition.
    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Compose the predicate for one channel from request filters.
    ///
    /// Filters that do not apply to the channel (`is_done` and `meeting`
    /// outside the to-do channel) are ignored.
    pub fn compose(
        channel: Channel,
        recipient: RecipientSelector,
        filter: &InboxFilter,
    ) -> AppResult<Self> {
        let mut predicate = Self::for_recipient(recipient);

        if let Some(source) = filter.source.as_deref().filter(|s| !s.trim().is_empty()) {
            predicate = predicate.and(Condition::Source(EventSource::parse(source)?));
        }
        if let Some(is_read) = filter.is_read {
            predicate = predicate.and(Condition::IsRead(is_read));
        }
        if let Some(is_bot) = filter.is_bot {
            predicate = predicate.and(Condition::IsBot(is_bot));
        }
        if let Some(since) = parse_start_time(filter.start_time.as_deref())? {
            predicate = predicate.and(Condition::Since(since));
        }

        if channel.has_done_flag() {
            if let Some(is_done) = filter.is_done {
                predicate = predicate.and(Condition::IsDone(is_done));
            }
            if let Some(window) = filter.meeting {
                predicate = predicate.and(Condition::Meeting(window));
            }
        } else if filter.is_done.is_some() || filter.meeting.is_some() {
            debug!(channel = %channel, "Ignoring to-do only filters");
        }

        if let Some(keys) = &filter.keys {
            let condition = if channel.is_rollup() {
                Condition::BusinessIds(keys.clone())
            } else {
                Condition::EventIds(keys.clone())
            };
            predicate = predicate.and(condition);
        }

        Ok(predicate)
    }

    /// The recipient selector.
    pub fn recipient(&self) -> &RecipientSelector {
        &self.recipient
    }

    /// The conditions beyond recipient scoping.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Render only the recipient condition (used before rollup collapsing).
    pub fn push_recipient(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        Condition::Recipient(self.recipient.clone()).push_to(qb);
    }

    /// Render ` WHERE ...` with the base filter and every condition.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE l.is_deleted = FALSE AND r.is_deleted = FALSE AND ");
        self.push_recipient(qb);
        for condition in &self.conditions {
            qb.push(" AND ");
            condition.push_to(qb);
        }
    }
}

/// Parse the optional start-time bound; blank means no bound.
pub fn parse_start_time(raw: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|e| AppError::validation(format!("invalid startTime '{raw}': {e}"))),
    }
}
