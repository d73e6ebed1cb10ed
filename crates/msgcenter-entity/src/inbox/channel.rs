//! Channel link kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A relationship kind binding events to recipients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Direct "I am watching this" relation.
    Follow,
    /// "I am mentioned or targeted" relation.
    Related,
    /// To-do rollup keyed by business id.
    Todo,
}

impl Channel {
    /// All channels, in the order they appear in the combined inbox.
    pub const ALL: [Channel; 3] = [Self::Follow, Self::Related, Self::Todo];

    /// Label used in the `channel` column of inbox rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Related => "related",
            Self::Todo => "todo",
        }
    }

    /// Backing link table.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Follow => "follow_message",
            Self::Related => "related_message",
            Self::Todo => "todo_message",
        }
    }

    /// Whether rows collapse to the latest one per `(business_id, recipient_id)`.
    pub fn is_rollup(&self) -> bool {
        matches!(self, Self::Todo)
    }

    /// Whether the link carries an `is_done` flag.
    pub fn has_done_flag(&self) -> bool {
        matches!(self, Self::Todo)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
