//! # msgcenter-filter
//!
//! Turns the flat, human-facing fields of a subscription request into a
//! canonical filter document: one flat `payload path -> filter expression`
//! map per `(source, event type)`.
//!
//! Everything in this crate is pure; no I/O happens here.

pub mod compiler;
pub mod expression;
pub mod kind;
pub mod request;
pub mod schema;

pub use compiler::{CompiledFilter, compile};
pub use expression::{FilterExpr, PathMerge};
pub use kind::FilterKind;
pub use request::SubscribeRequest;
pub use schema::CanonicalFilter;
