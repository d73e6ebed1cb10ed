//! Repository implementations for message center entities.

pub mod inbox;
pub mod subscription;

pub use inbox::InboxRepository;
pub use subscription::SubscriptionRepository;
