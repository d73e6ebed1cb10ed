//! Core traits defined in `msgcenter-core` and implemented by other crates.

pub mod identity;

pub use identity::{SecondaryIdentity, SecondaryIdentityResolver};
