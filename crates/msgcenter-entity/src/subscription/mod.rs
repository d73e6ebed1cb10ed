//! User-defined subscriptions.

pub mod model;

pub use model::{CreateSubscription, Subscription};
