//! # msgcenter-entity
//!
//! Domain entity models for the message center. Every struct in this crate
//! represents a database row or a domain value object. Database entities
//! derive `sqlx::FromRow`.

pub mod event;
pub mod inbox;
pub mod recipient;
pub mod subscription;
