//! Upstream activity events.

pub mod model;
pub mod source;

pub use model::Event;
pub use source::EventSource;
