//! Subscription repository implementation.

use sqlx::PgPool;

use msgcenter_core::error::{AppError, ErrorKind};
use msgcenter_core::result::AppResult;
use msgcenter_core::types::SubscriptionId;
use msgcenter_entity::subscription::{CreateSubscription, Subscription};

const UNIQUE_VIOLATION: &str = "23505";

/// Repository for subscription CRUD operations.
#[derive(Debug, Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a subscription.
    ///
    /// A live subscription with the same `(source, mode_name, owner)` is a
    /// [`ErrorKind::Conflict`].
    pub async fn create(&self, data: &CreateSubscription) -> AppResult<Subscription> {
        sqlx::query_as::<_, Subscription>(
            "INSERT INTO subscription (id, source, event_type, mode_name, spec_version, mode_filter, user_name, is_default) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(SubscriptionId::new())
        .bind(&data.source)
        .bind(&data.event_type)
        .bind(&data.mode_name)
        .bind(&data.spec_version)
        .bind(&data.mode_filter)
        .bind(&data.user_name)
        .bind(data.is_default)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::with_source(
                    ErrorKind::Conflict,
                    format!(
                        "subscription '{}' already exists for source '{}'",
                        data.mode_name, data.source
                    ),
                    e,
                )
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create subscription", e)
            }
        })
    }

    /// Find a live subscription by id.
    pub async fn find_by_id(&self, id: SubscriptionId) -> AppResult<Option<Subscription>> {
        sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscription WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find subscription", e))
    }

    /// List a user's own subscriptions plus the defaults, optionally for one source.
    pub async fn list_for_user(
        &self,
        user_name: &str,
        source: Option<&str>,
    ) -> AppResult<Vec<Subscription>> {
        sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscription \
             WHERE is_deleted = FALSE AND (user_name = $1 OR is_default = TRUE) \
             AND ($2::text IS NULL OR source = $2) \
             ORDER BY is_default DESC, created_at ASC",
        )
        .bind(user_name)
        .bind(source)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list subscriptions", e))
    }

    /// Rename a user's subscription. Returns `None` if nothing matched.
    pub async fn rename(
        &self,
        id: SubscriptionId,
        user_name: &str,
        mode_name: &str,
    ) -> AppResult<Option<Subscription>> {
        sqlx::query_as::<_, Subscription>(
            "UPDATE subscription SET mode_name = $3, updated_at = NOW() \
             WHERE id = $1 AND user_name = $2 AND is_default = FALSE AND is_deleted = FALSE \
             RETURNING *",
        )
        .bind(id)
        .bind(user_name)
        .bind(mode_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::with_source(
                    ErrorKind::Conflict,
                    format!("subscription '{mode_name}' already exists"),
                    e,
                )
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to rename subscription", e)
            }
        })
    }

    /// Soft-delete a user's subscription. Returns whether a row changed.
    pub async fn soft_delete(&self, id: SubscriptionId, user_name: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE subscription SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND user_name = $2 AND is_default = FALSE AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(user_name)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete subscription", e))?;
        Ok(result.rows_affected() > 0)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}
