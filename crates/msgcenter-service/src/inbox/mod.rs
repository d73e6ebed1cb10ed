//! Inbox views and read-state marks.

pub mod service;

pub use service::InboxService;
