//! # msgcenter-database
//!
//! PostgreSQL connection management, the inbox query engine (predicate
//! composer, channel scopes, page and mutation statements), and the
//! concrete repositories.

pub mod connection;
pub mod migration;
pub mod query;
pub mod repositories;

pub use connection::DatabasePool;
