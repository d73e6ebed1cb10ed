//! # msgcenter-service
//!
//! Business logic service layer for the message center. Each service
//! orchestrates repositories, the filter compiler and the identity
//! resolver to implement one group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. Every entry point takes a
//! [`RequestContext`] whose cancellation token aborts the in-flight store
//! call.

pub mod context;
pub mod identity;
pub mod inbox;
pub mod subscription;

pub use context::RequestContext;
pub use identity::UserServiceClient;
pub use inbox::InboxService;
pub use subscription::SubscriptionService;
