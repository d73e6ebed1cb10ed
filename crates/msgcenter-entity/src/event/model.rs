//! Event entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An immutable record of something that happened upstream.
///
/// Rows are written by the ingester; this service only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    /// Upstream event identifier (unique).
    pub event_id: String,
    /// Source tag, see [`EventSource`](super::EventSource).
    pub source: String,
    /// Event type (`issue`, `pr`, `note`, `push`, `meeting`, `build`, `cve`, ...).
    pub event_type: String,
    /// When the event happened upstream.
    pub event_time: DateTime<Utc>,
    /// Acting user on the upstream platform.
    pub actor: String,
    /// Display title.
    pub title: String,
    /// Display summary.
    pub summary: String,
    /// Link back to the upstream resource.
    pub source_url: String,
    /// Repository, sig or project the event belongs to.
    pub source_group: String,
    /// Business entity (issue, PR, meeting, ...) shared by related events.
    pub business_id: Option<String>,
    /// Raw payload matched against canonical filters.
    pub payload: serde_json::Value,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
}
