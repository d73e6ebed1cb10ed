//! One channel's slice of an inbox query.

use sqlx::{Postgres, QueryBuilder};

use msgcenter_entity::inbox::Channel;

use super::predicate::Predicate;

/// A channel, its composed predicate, and whether rollup rows are collapsed
/// to the latest one per `(business_id, recipient_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelScope {
    /// Link table to read.
    pub channel: Channel,
    /// Collapse rollup rows (ignored for non-rollup channels).
    pub collapse: bool,
    /// Shared predicate for both the page and the mutation.
    pub predicate: Predicate,
}

impl ChannelScope {
    /// Uncollapsed scope.
    pub fn new(channel: Channel, predicate: Predicate) -> Self {
        Self {
            channel,
            collapse: false,
            predicate,
        }
    }

    /// Collapsed scope; only rollup channels actually collapse.
    pub fn collapsed(channel: Channel, predicate: Predicate) -> Self {
        Self {
            channel,
            collapse: channel.is_rollup(),
            predicate,
        }
    }

    /// Whether this scope emits a latest-row CTE.
    pub fn is_collapsed(&self) -> bool {
        self.collapse && self.channel.is_rollup()
    }

    /// Name of the latest-row CTE for this scope.
    fn latest_name(&self, index: usize) -> String {
        format!("latest_{}_{index}", self.channel.as_str())
    }

    /// Column identifying a link for mutation purposes.
    ///
    /// A collapsed row stands for its whole business entity, so marks on it
    /// reach every row of that business. Uncollapsed rollup rows are marked
    /// one by one.
    pub fn key_column(&self) -> &'static str {
        match (self.channel.is_rollup(), self.is_collapsed()) {
            (true, true) => "business_id",
            (true, false) => "id",
            (false, _) => "event_id",
        }
    }

    /// Render `latest_<channel>_<index> AS (...)` when collapsed.
    ///
    /// Returns `false` (and renders nothing) for uncollapsed scopes.
    pub fn push_latest_cte(&self, qb: &mut QueryBuilder<'_, Postgres>, index: usize) -> bool {
        if !self.is_collapsed() {
            return false;
        }
        qb.push(self.latest_name(index));
        qb.push(format!(
            " AS (SELECT DISTINCT ON (l.business_id, l.recipient_id) l.id AS link_id \
             FROM {} l JOIN recipient r ON r.id = l.recipient_id \
             WHERE l.is_deleted = FALSE AND r.is_deleted = FALSE AND ",
            self.channel.table()
        ));
        self.predicate.push_recipient(qb);
        qb.push(" ORDER BY l.business_id, l.recipient_id, l.updated_at DESC, l.id DESC)");
        true
    }

    /// Render the shared ` FROM ... WHERE ...` fragment.
    pub fn push_from_where(&self, qb: &mut QueryBuilder<'_, Postgres>, index: usize) {
        qb.push(format!(
            " FROM {} l JOIN cloud_event e ON e.event_id = l.event_id \
             JOIN recipient r ON r.id = l.recipient_id",
            self.channel.table()
        ));
        if self.is_collapsed() {
            qb.push(format!(
                " JOIN {} lt ON lt.link_id = l.id",
                self.latest_name(index)
            ));
        }
        self.predicate.push_where(qb);
    }

    /// Render the unified inbox row projection for this scope.
    pub fn push_row_select(&self, qb: &mut QueryBuilder<'_, Postgres>, index: usize) {
        let (business_id, is_done) = if self.channel.is_rollup() {
            ("l.business_id", "l.is_done")
        } else {
            ("e.business_id", "NULL::boolean")
        };
        qb.push(format!(
            "SELECT '{}'::text AS channel, e.event_id, e.source, e.event_type, e.event_time, \
             e.actor, e.title, e.summary, e.source_url, e.source_group, \
             {business_id} AS business_id, l.recipient_id, l.is_read, \
             {is_done} AS is_done, l.updated_at",
            self.channel.as_str()
        ));
        self.push_from_where(qb, index);
    }

    /// Render the identifying-key projection used by mutations.
    pub fn push_key_select(&self, qb: &mut QueryBuilder<'_, Postgres>, index: usize) {
        qb.push(format!(
            "SELECT DISTINCT l.{}, l.recipient_id",
            self.key_column()
        ));
        self.push_from_where(qb, index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::predicate::{Condition, RecipientSelector};

    fn todo_scope() -> ChannelScope {
        let predicate = Predicate::for_recipient(RecipientSelector::Identity("octo".into()))
            .and(Condition::IsRead(false));
        ChannelScope::collapsed(Channel::Todo, predicate)
    }

    #[test]
    fn test_collapse_only_applies_to_rollups() {
        let predicate = Predicate::for_recipient(RecipientSelector::UserId("u1".into()));
        let follow = ChannelScope::collapsed(Channel::Follow, predicate);
        assert!(!follow.is_collapsed());

        let mut qb = QueryBuilder::<Postgres>::new("");
        assert!(!follow.push_latest_cte(&mut qb, 0));
        assert_eq!(qb.sql(), "");
    }

    #[test]
    fn test_latest_cte_orders_by_update_then_id() {
        let scope = todo_scope();
        let mut qb = QueryBuilder::<Postgres>::new("WITH ");
        assert!(scope.push_latest_cte(&mut qb, 2));
        let sql = qb.sql();
        assert!(sql.starts_with("WITH latest_todo_2 AS (SELECT DISTINCT ON (l.business_id, l.recipient_id)"));
        assert!(sql.contains("r.gitee_user_name = $1"));
        assert!(sql.ends_with("ORDER BY l.business_id, l.recipient_id, l.updated_at DESC, l.id DESC)"));
    }

    #[test]
    fn test_row_and_key_selects_share_filter() {
        let scope = todo_scope();

        let mut rows = QueryBuilder::<Postgres>::new("");
        scope.push_row_select(&mut rows, 0);
        let mut keys = QueryBuilder::<Postgres>::new("");
        scope.push_key_select(&mut keys, 0);

        let rows = rows.sql().to_string();
        let keys = keys.sql().to_string();
        let rows_from = &rows[rows.find(" FROM ").unwrap()..];
        let keys_from = &keys[keys.find(" FROM ").unwrap()..];
        assert_eq!(rows_from, keys_from);
        assert!(rows_from.contains("JOIN latest_todo_0 lt ON lt.link_id = l.id"));
        assert!(keys.starts_with("SELECT DISTINCT l.business_id, l.recipient_id"));
        assert!(rows.contains("l.is_done AS is_done"));
    }

    #[test]
    fn test_non_rollup_projection() {
        let predicate = Predicate::for_recipient(RecipientSelector::UserId("u1".into()));
        let scope = ChannelScope::new(Channel::Follow, predicate);
        let mut qb = QueryBuilder::<Postgres>::new("");
        scope.push_row_select(&mut qb, 0);
        let sql = qb.sql();
        assert!(sql.starts_with("SELECT 'follow'::text AS channel"));
        assert!(sql.contains("e.business_id AS business_id"));
        assert!(sql.contains("NULL::boolean AS is_done"));
        assert!(sql.contains(" FROM follow_message l "));
        assert_eq!(scope.key_column(), "event_id");
    }

    #[test]
    fn test_uncollapsed_todo_keys_on_row_id() {
        let predicate = Predicate::for_recipient(RecipientSelector::Identity("octo".into()));
        let every = ChannelScope::new(Channel::Todo, predicate.clone());
        assert_eq!(every.key_column(), "id");

        let mut qb = QueryBuilder::<Postgres>::new("");
        every.push_key_select(&mut qb, 0);
        assert!(qb.sql().starts_with("SELECT DISTINCT l.id, l.recipient_id FROM todo_message l "));

        assert_eq!(ChannelScope::collapsed(Channel::Todo, predicate).key_column(), "business_id");
    }
}
