//! Subscription creation, listing, renaming and deletion.

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use msgcenter_core::error::AppError;
use msgcenter_core::result::AppResult;
use msgcenter_core::types::SubscriptionId;
use msgcenter_database::repositories::SubscriptionRepository;
use msgcenter_entity::event::EventSource;
use msgcenter_entity::subscription::{CreateSubscription, Subscription};
use msgcenter_filter::{SubscribeRequest, compile};

use crate::context::RequestContext;

/// Validates, compiles and persists user subscriptions.
#[derive(Debug, Clone)]
pub struct SubscriptionService {
    /// Subscription repository.
    repo: Arc<SubscriptionRepository>,
}

impl SubscriptionService {
    /// Creates a new subscription service.
    pub fn new(repo: Arc<SubscriptionRepository>) -> Self {
        Self { repo }
    }

    /// Compiles the request into a canonical filter and stores it for the
    /// current user.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: &SubscribeRequest,
    ) -> AppResult<Subscription> {
        let request = SubscribeRequest {
            mode_name: request.mode_name.trim().to_string(),
            ..request.clone()
        };
        request.validate()?;
        let compiled = compile(&request)?;
        let mode_filter = compiled.filter.to_document()?;

        let data = CreateSubscription {
            source: compiled.kind.source().as_str().to_string(),
            event_type: compiled.kind.event_type().to_string(),
            mode_name: request.mode_name,
            spec_version: compiled.spec_version,
            mode_filter,
            user_name: Some(ctx.user_name.clone()),
            is_default: false,
        };

        let subscription = ctx
            .run("create subscription", self.repo.create(&data))
            .await?;

        info!(
            subscription_id = %subscription.id,
            kind = %compiled.kind,
            matches_everything = compiled.filter.is_unconstrained(),
            user = %ctx.user_name,
            "Subscription created"
        );
        Ok(subscription)
    }

    /// Lists the user's subscriptions and the defaults, optionally for one source.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        source: Option<&str>,
    ) -> AppResult<Vec<Subscription>> {
        let source = source
            .filter(|s| !s.trim().is_empty())
            .map(EventSource::parse)
            .transpose()?;
        ctx.run(
            "list subscriptions",
            self.repo
                .list_for_user(&ctx.user_name, source.as_ref().map(EventSource::as_str)),
        )
        .await
    }

    /// Renames one of the user's subscriptions.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        id: SubscriptionId,
        mode_name: &str,
    ) -> AppResult<Subscription> {
        let mode_name = mode_name.trim();
        if mode_name.is_empty() || mode_name.chars().count() > 64 {
            return Err(AppError::validation(
                "modeName must be between 1 and 64 characters",
            ));
        }

        self.check_mutable(ctx, id).await?;
        ctx.run("rename subscription", self.repo.rename(id, &ctx.user_name, mode_name))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Subscription {id} not found")))
    }

    /// Soft-deletes one of the user's subscriptions.
    pub async fn delete(&self, ctx: &RequestContext, id: SubscriptionId) -> AppResult<()> {
        self.check_mutable(ctx, id).await?;
        let deleted = ctx
            .run("delete subscription", self.repo.soft_delete(id, &ctx.user_name))
            .await?;
        if !deleted {
            return Err(AppError::not_found(format!("Subscription {id} not found")));
        }
        info!(subscription_id = %id, user = %ctx.user_name, "Subscription deleted");
        Ok(())
    }

    /// Default subscriptions are read-only; other users' ones do not exist
    /// as far as the caller is concerned.
    async fn check_mutable(&self, ctx: &RequestContext, id: SubscriptionId) -> AppResult<()> {
        let existing = ctx
            .run("find subscription", self.repo.find_by_id(id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Subscription {id} not found")))?;

        if existing.is_default {
            warn!(subscription_id = %id, user = %ctx.user_name, "Refused to modify default subscription");
            return Err(AppError::authorization(
                "default subscriptions cannot be renamed or deleted",
            ));
        }
        if existing.user_name.as_deref() != Some(ctx.user_name.as_str()) {
            return Err(AppError::not_found(format!("Subscription {id} not found")));
        }
        Ok(())
    }
}
