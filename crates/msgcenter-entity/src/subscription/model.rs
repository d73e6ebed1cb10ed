//! Subscription entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use msgcenter_core::types::SubscriptionId;

/// A named, source-specific filter selecting events of interest.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Unique subscription identifier.
    pub id: SubscriptionId,
    /// Source tag.
    pub source: String,
    /// Event type the filter applies to.
    pub event_type: String,
    /// User-visible name, unique per `(source, owner)`.
    pub mode_name: String,
    /// Version of the canonical filter schema.
    pub spec_version: String,
    /// Compiled canonical filter document.
    pub mode_filter: serde_json::Value,
    /// Owner; `None` for default subscriptions.
    pub user_name: Option<String>,
    /// Default subscriptions cannot be renamed or deleted.
    pub is_default: bool,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// When the subscription was created.
    pub created_at: DateTime<Utc>,
    /// When the subscription was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Whether rename and delete are allowed.
    pub fn is_mutable(&self) -> bool {
        !self.is_default && !self.is_deleted
    }
}

/// Data required to insert a subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubscription {
    /// Source tag.
    pub source: String,
    /// Event type.
    pub event_type: String,
    /// User-visible name.
    pub mode_name: String,
    /// Version of the canonical filter schema.
    pub spec_version: String,
    /// Compiled canonical filter document.
    pub mode_filter: serde_json::Value,
    /// Owner; `None` for default subscriptions.
    pub user_name: Option<String>,
    /// Whether this is a default subscription.
    pub is_default: bool,
}
