//! Inbox listing and read-state changes.

use std::sync::Arc;

use tracing::{debug, info, warn};

use msgcenter_core::error::AppError;
use msgcenter_core::result::AppResult;
use msgcenter_core::traits::{SecondaryIdentity, SecondaryIdentityResolver};
use msgcenter_core::types::pagination::{PageRequest, PageResponse};
use msgcenter_database::query::{ChannelScope, InboxFilter, InboxView, LinkFlag};
use msgcenter_database::repositories::InboxRepository;
use msgcenter_entity::inbox::InboxMessage;

use crate::context::RequestContext;

/// Serves inbox pages and applies read, done and delete marks.
#[derive(Clone)]
pub struct InboxService {
    /// Inbox repository.
    repo: Arc<InboxRepository>,
    /// Secondary identity lookup.
    resolver: Arc<dyn SecondaryIdentityResolver>,
}

impl std::fmt::Debug for InboxService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboxService")
            .field("repo", &self.repo)
            .finish_non_exhaustive()
    }
}

impl InboxService {
    /// Creates a new inbox service.
    pub fn new(repo: Arc<InboxRepository>, resolver: Arc<dyn SecondaryIdentityResolver>) -> Self {
        Self { repo, resolver }
    }

    /// Lists one page of the given inbox view.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        view: InboxView,
        filter: &InboxFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<InboxMessage>> {
        let page = page.normalized();
        let scopes = self.scopes(ctx, view, filter).await?;
        if scopes.is_empty() {
            return Ok(PageResponse::empty(&page));
        }
        ctx.run("list inbox", self.repo.fetch_page(&scopes, &page))
            .await
    }

    /// Marks the rows of a view matching `filter` as read.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        view: InboxView,
        filter: &InboxFilter,
    ) -> AppResult<u64> {
        self.mark(ctx, view, filter, LinkFlag::Read).await
    }

    /// Marks to-do rows matching `filter` as done.
    pub async fn mark_done(
        &self,
        ctx: &RequestContext,
        view: InboxView,
        filter: &InboxFilter,
    ) -> AppResult<u64> {
        if !matches!(
            view,
            InboxView::Todo | InboxView::TodoLatest | InboxView::Meeting
        ) {
            return Err(AppError::validation(format!(
                "view '{view}' has no done state"
            )));
        }
        self.mark(ctx, view, filter, LinkFlag::Done).await
    }

    /// Soft-deletes the rows of a view matching `filter`.
    pub async fn remove(
        &self,
        ctx: &RequestContext,
        view: InboxView,
        filter: &InboxFilter,
    ) -> AppResult<u64> {
        self.mark(ctx, view, filter, LinkFlag::Deleted).await
    }

    /// Marks everything visible to the user as read, across all channels,
    /// in one transaction.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        let scopes = self
            .scopes(ctx, InboxView::All, &InboxFilter::default())
            .await?;
        let affected = ctx
            .run("mark all read", self.repo.mark_all(&scopes, LinkFlag::Read))
            .await?;
        info!(user_id = %ctx.user_id, affected, "Marked all inbox rows read");
        Ok(affected)
    }

    async fn mark(
        &self,
        ctx: &RequestContext,
        view: InboxView,
        filter: &InboxFilter,
        flag: LinkFlag,
    ) -> AppResult<u64> {
        let scopes = self.scopes(ctx, view, filter).await?;
        let affected = match scopes.as_slice() {
            [] => 0,
            [scope] => ctx.run("mark inbox", self.repo.mark(scope, flag)).await?,
            scopes => ctx.run("mark inbox", self.repo.mark_all(scopes, flag)).await?,
        };
        debug!(view = %view, flag = flag.column(), affected, "Inbox mark applied");
        Ok(affected)
    }

    async fn scopes(
        &self,
        ctx: &RequestContext,
        view: InboxView,
        filter: &InboxFilter,
    ) -> AppResult<Vec<ChannelScope>> {
        let identity = ctx
            .run("resolve identity", self.resolver.resolve(&ctx.user_id))
            .await?;
        if identity == SecondaryIdentity::Absent && view.needs_identity() {
            warn!(user_id = %ctx.user_id, view = %view, "No secondary identity, returning nothing");
        }
        view.scopes(&ctx.user_id, &identity, filter)
    }
}
