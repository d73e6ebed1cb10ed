//! Recipient entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use msgcenter_core::types::RecipientId;

/// A user's notification identity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipient {
    /// Unique recipient identifier.
    pub id: RecipientId,
    /// Internal user id.
    pub user_id: String,
    /// Login on the code-hosting platform, if linked.
    pub gitee_user_name: Option<String>,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// When the recipient was created.
    pub created_at: DateTime<Utc>,
    /// When the recipient was last updated.
    pub updated_at: DateTime<Utc>,
}
