//! Shared test helpers for integration tests.
//!
//! Every test seeds its own recipients and events under fresh ids, so tests
//! can share one database and run in parallel without cleanup.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use msgcenter_core::result::AppResult;
use msgcenter_core::traits::{SecondaryIdentity, SecondaryIdentityResolver};
use msgcenter_core::types::RecipientId;
use msgcenter_database::repositories::{InboxRepository, SubscriptionRepository};
use msgcenter_entity::event::Event;
use msgcenter_entity::recipient::Recipient;
use msgcenter_service::{InboxService, RequestContext, SubscriptionService};

/// Resolver answering with a fixed identity.
pub struct FixedResolver(pub SecondaryIdentity);

#[async_trait]
impl SecondaryIdentityResolver for FixedResolver {
    async fn resolve(&self, _user_id: &str) -> AppResult<SecondaryIdentity> {
        Ok(self.0.clone())
    }
}

/// A migrated database plus one freshly named user.
pub struct TestApp {
    /// Database pool for direct queries
    pub pool: PgPool,
    /// Internal user id of the test user
    pub user_id: String,
    /// Gitee login of the test user
    pub login: String,
    /// Recipient row of the test user
    pub recipient: RecipientId,
}

impl TestApp {
    /// Connect to `DATABASE_URL`, migrate, and create a recipient.
    pub async fn new() -> Self {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .expect("Failed to connect to test database");

        msgcenter_database::migration::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let suffix = Uuid::new_v4().simple().to_string();
        let user_id = format!("user-{suffix}");
        let login = format!("login-{suffix}");
        let recipient = insert_recipient(&pool, &user_id, Some(&login)).await.id;

        Self {
            pool,
            user_id,
            login,
            recipient,
        }
    }

    /// Request context for the test user.
    pub fn ctx(&self) -> RequestContext {
        RequestContext::new(self.user_id.clone(), self.user_id.clone())
    }

    /// Inbox service resolving the test user's login.
    pub fn inbox(&self) -> InboxService {
        self.inbox_with(SecondaryIdentity::Known(self.login.clone()))
    }

    /// Inbox service with an explicit identity answer.
    pub fn inbox_with(&self, identity: SecondaryIdentity) -> InboxService {
        InboxService::new(
            Arc::new(InboxRepository::new(self.pool.clone())),
            Arc::new(FixedResolver(identity)),
        )
    }

    /// Subscription service.
    pub fn subscriptions(&self) -> SubscriptionService {
        SubscriptionService::new(Arc::new(SubscriptionRepository::new(self.pool.clone())))
    }

    /// Insert an event and return its id.
    pub async fn event(&self, source: &str, actor: &str, at: DateTime<Utc>) -> String {
        self.event_for(source, actor, at, None).await
    }

    /// Insert an event belonging to a business entity.
    pub async fn event_for(
        &self,
        source: &str,
        actor: &str,
        at: DateTime<Utc>,
        business_id: Option<&str>,
    ) -> String {
        let event_id = format!("evt-{}", Uuid::new_v4().simple());
        let event = sqlx::query_as::<_, Event>(
            "INSERT INTO cloud_event (event_id, source, event_type, event_time, actor, title, business_id) \
             VALUES ($1, $2, 'issue', $3, $4, $5, $6) RETURNING *",
        )
        .bind(&event_id)
        .bind(source)
        .bind(at)
        .bind(actor)
        .bind(format!("event {event_id}"))
        .bind(business_id)
        .fetch_one(&self.pool)
        .await
        .expect("insert event");
        event.event_id
    }

    /// Link an event on the follow channel.
    pub async fn follow(&self, event_id: &str, updated_at: DateTime<Utc>) {
        self.link("follow_message", event_id, updated_at).await;
    }

    /// Link an event on the related channel.
    pub async fn related(&self, event_id: &str, updated_at: DateTime<Utc>) {
        self.link("related_message", event_id, updated_at).await;
    }

    async fn link(&self, table: &str, event_id: &str, updated_at: DateTime<Utc>) {
        sqlx::query(&format!(
            "INSERT INTO {table} (event_id, recipient_id, updated_at) VALUES ($1, $2, $3)"
        ))
        .bind(event_id)
        .bind(self.recipient)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .expect("insert link");
    }

    /// Add a to-do row for a business entity.
    pub async fn todo(
        &self,
        business_id: &str,
        event_id: &str,
        updated_at: DateTime<Utc>,
        deadline: Option<DateTime<Utc>>,
    ) {
        sqlx::query(
            "INSERT INTO todo_message (business_id, event_id, recipient_id, updated_at, deadline) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(business_id)
        .bind(event_id)
        .bind(self.recipient)
        .bind(updated_at)
        .bind(deadline)
        .execute(&self.pool)
        .await
        .expect("insert todo");
    }
}

/// Insert a recipient row.
pub async fn insert_recipient(pool: &PgPool, user_id: &str, login: Option<&str>) -> Recipient {
    sqlx::query_as::<_, Recipient>(
        "INSERT INTO recipient (id, user_id, gitee_user_name) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(RecipientId::new())
    .bind(user_id)
    .bind(login)
    .fetch_one(pool)
    .await
    .expect("insert recipient")
}

/// A fixed base time with `minutes` added, for deterministic ordering.
pub fn at(minutes: i64) -> DateTime<Utc> {
    "2024-03-01T08:00:00Z".parse::<DateTime<Utc>>().expect("valid timestamp") + Duration::minutes(minutes)
}

/// A unique business id.
pub fn business_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}
