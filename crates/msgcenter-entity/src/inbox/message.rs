//! Unified inbox row returned by every channel query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use msgcenter_core::types::RecipientId;

use super::channel::Channel;

/// One visible inbox entry: an event joined with its channel link.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InboxMessage {
    /// Channel the row came from (`follow`, `related`, `todo`).
    pub channel: String,
    /// Upstream event identifier.
    pub event_id: String,
    /// Source tag or URI, as stored.
    pub source: String,
    /// Event type.
    pub event_type: String,
    /// When the event happened upstream.
    pub event_time: DateTime<Utc>,
    /// Acting user.
    pub actor: String,
    /// Display title.
    pub title: String,
    /// Display summary.
    pub summary: String,
    /// Link to the upstream resource.
    pub source_url: String,
    /// Repository, sig or project.
    pub source_group: String,
    /// Business entity id (present on rollup rows).
    pub business_id: Option<String>,
    /// Recipient the link belongs to.
    pub recipient_id: RecipientId,
    /// Read flag of the link.
    pub is_read: bool,
    /// Done flag (to-do rows only).
    pub is_done: Option<bool>,
    /// Last update of the link row; rollups pick the latest.
    pub updated_at: DateTime<Utc>,
}

impl InboxMessage {
    /// Key that selects this row through an inbox `keys` filter: the
    /// business id on to-do rows, the event id everywhere else.
    pub fn key(&self) -> &str {
        match self.business_id.as_deref() {
            Some(business_id) if self.channel == Channel::Todo.as_str() => business_id,
            _ => &self.event_id,
        }
    }
}
