//! Store-backed integration tests.
//!
//! These need a live PostgreSQL reachable through `DATABASE_URL` and are
//! ignored by default: `cargo test --test integration -- --ignored`.

mod helpers;
mod inbox_test;
mod read_state_test;
mod subscription_test;
