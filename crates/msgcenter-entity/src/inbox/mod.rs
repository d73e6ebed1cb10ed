//! Inbox channels and the unified inbox row.

pub mod channel;
pub mod message;

pub use channel::Channel;
pub use message::InboxMessage;
