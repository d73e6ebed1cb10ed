//! Page and mutation statements built from channel scopes.

use sqlx::{Postgres, QueryBuilder};

use msgcenter_core::error::AppError;
use msgcenter_core::result::AppResult;
use msgcenter_core::types::PageRequest;

use super::scope::ChannelScope;

/// A one-way flag on a channel link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkFlag {
    /// `unread -> read`
    Read,
    /// `active -> done` (to-do channel only)
    Done,
    /// `active -> deleted`
    Deleted,
}

impl LinkFlag {
    /// Column holding the flag.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Read => "is_read",
            Self::Done => "is_done",
            Self::Deleted => "is_deleted",
        }
    }
}

fn push_ctes(qb: &mut QueryBuilder<'static, Postgres>, scopes: &[ChannelScope]) -> bool {
    let mut any = false;
    for (index, scope) in scopes.iter().enumerate() {
        if scope.is_collapsed() {
            qb.push(if any { ", " } else { "WITH " });
            scope.push_latest_cte(qb, index);
            any = true;
        }
    }
    any
}

/// Build the page statement for one or more channel scopes.
///
/// The statement always returns at least one row: `total_count` comes from
/// a windowed count over every matching row, and the page columns are
/// `NULL` when the requested page lies past the end.
pub fn page_statement(
    scopes: &[ChannelScope],
    page: &PageRequest,
) -> AppResult<QueryBuilder<'static, Postgres>> {
    if scopes.is_empty() {
        return Err(AppError::internal("page statement needs at least one scope"));
    }

    let mut qb = QueryBuilder::new("");
    let has_ctes = push_ctes(&mut qb, scopes);
    qb.push(if has_ctes { ", base AS (" } else { "WITH base AS (" });
    for (index, scope) in scopes.iter().enumerate() {
        if index > 0 {
            qb.push(" UNION ALL ");
        }
        scope.push_row_select(&mut qb, index);
    }
    qb.push(
        "), matched AS (SELECT base.*, COUNT(*) OVER () AS window_total FROM base) \
         SELECT t.total_count, p.* \
         FROM (SELECT COALESCE(MAX(window_total), 0) AS total_count FROM matched) t \
         LEFT JOIN LATERAL (SELECT * FROM matched \
         ORDER BY updated_at DESC, event_id DESC, channel LIMIT ",
    );
    let limit = i64::try_from(page.limit())
        .map_err(|_| AppError::validation(format!("page size {} is out of range", page.page_size)))?;
    let offset = i64::try_from(page.offset())
        .map_err(|_| AppError::validation(format!("page {} is out of range", page.page)))?;
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);
    qb.push(") p ON TRUE");

    Ok(qb)
}

/// Build the `WITH matched AS (...) UPDATE ...` statement for one scope.
pub fn mutation_statement(
    scope: &ChannelScope,
    flag: LinkFlag,
) -> AppResult<QueryBuilder<'static, Postgres>> {
    if flag == LinkFlag::Done && !scope.channel.has_done_flag() {
        return Err(AppError::validation(format!(
            "channel '{}' has no done flag",
            scope.channel
        )));
    }

    let key = scope.key_column();
    let column = flag.column();

    let mut qb = QueryBuilder::new("");
    let has_ctes = push_ctes(&mut qb, std::slice::from_ref(scope));
    qb.push(if has_ctes { ", matched AS (" } else { "WITH matched AS (" });
    scope.push_key_select(&mut qb, 0);
    qb.push(format!(
        ") UPDATE {table} t SET {column} = TRUE FROM matched m \
         WHERE t.{key} = m.{key} AND t.recipient_id = m.recipient_id AND t.{column} = FALSE",
        table = scope.channel.table(),
    ));

    Ok(qb)
}
