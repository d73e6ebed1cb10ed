//! Inbox query engine.
//!
//! A request is turned into one [`ChannelScope`] per channel link table.
//! The same scopes feed both [`page_statement`] and [`mutation_statement`],
//! so a mark operation touches exactly the rows the page would show.

pub mod predicate;
pub mod scope;
pub mod statement;
pub mod view;

pub use predicate::{Condition, InboxFilter, MeetingWindow, Predicate, RecipientSelector};
pub use scope::ChannelScope;
pub use statement::{LinkFlag, mutation_statement, page_statement};
pub use view::InboxView;
