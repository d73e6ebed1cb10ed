//! Inbox repository: page reads and read-state mutations over channel scopes.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use tracing::debug;

use msgcenter_core::error::{AppError, ErrorKind};
use msgcenter_core::result::AppResult;
use msgcenter_core::types::pagination::{PageRequest, PageResponse};
use msgcenter_entity::inbox::InboxMessage;

use crate::query::{ChannelScope, LinkFlag, mutation_statement, page_statement};

/// Repository for the follow, related and to-do link tables.
#[derive(Debug, Clone)]
pub struct InboxRepository {
    pool: PgPool,
}

impl InboxRepository {
    /// Create a new inbox repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch one page across the given scopes, with the total match count.
    ///
    /// An empty scope list yields an empty page without touching the store.
    pub async fn fetch_page(
        &self,
        scopes: &[ChannelScope],
        page: &PageRequest,
    ) -> AppResult<PageResponse<InboxMessage>> {
        if scopes.is_empty() {
            return Ok(PageResponse::empty(page));
        }

        let label = scope_label(scopes);
        let mut qb = page_statement(scopes, page)?;
        debug!(channels = %label, sql = qb.sql(), "Fetching inbox page");

        let rows = qb.build().fetch_all(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, format!("{label}: fetch page"), e)
        })?;

        let (items, total) = decode_page(&rows)
            .map_err(|e| AppError::with_source(ErrorKind::Database, format!("{label}: decode page"), e))?;

        Ok(PageResponse::new(items, page, total))
    }

    /// Set `flag` on every link matching the scope. Returns the rows changed.
    ///
    /// Rows already carrying the flag are left alone, so repeating a mark
    /// changes nothing and is not an error.
    pub async fn mark(&self, scope: &ChannelScope, flag: LinkFlag) -> AppResult<u64> {
        let mut qb = mutation_statement(scope, flag)?;
        debug!(channel = %scope.channel, flag = flag.column(), "Marking inbox rows");

        let result = qb.build().execute(&self.pool).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("{}: mark {}", scope.channel, flag.column()),
                e,
            )
        })?;
        Ok(result.rows_affected())
    }

    /// Set `flag` across several scopes in one transaction.
    pub async fn mark_all(&self, scopes: &[ChannelScope], flag: LinkFlag) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let mut affected = 0;
        for scope in scopes {
            let mut qb = mutation_statement(scope, flag)?;
            let result = qb.build().execute(&mut *tx).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("{}: mark {}", scope.channel, flag.column()),
                    e,
                )
            })?;
            affected += result.rows_affected();
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        debug!(channels = %scope_label(scopes), affected, "Marked inbox rows");
        Ok(affected)
    }
}

fn scope_label(scopes: &[ChannelScope]) -> String {
    scopes
        .iter()
        .map(|s| s.channel.as_str())
        .collect::<Vec<_>>()
        .join("+")
}

/// Split the page statement's rows into items and the windowed total.
///
/// The first row always carries `total_count`; rows with a `NULL`
/// `event_id` are the placeholder emitted for an empty or past-the-end page.
fn decode_page(rows: &[PgRow]) -> Result<(Vec<InboxMessage>, u64), sqlx::Error> {
    let total = match rows.first() {
        Some(row) => row.try_get::<i64, _>("total_count")?,
        None => 0,
    };

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        if row.try_get::<Option<String>, _>("event_id")?.is_some() {
            items.push(InboxMessage::from_row(row)?);
        }
    }

    Ok((items, total.max(0) as u64))
}
