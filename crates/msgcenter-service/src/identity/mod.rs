//! Secondary identity resolution.

pub mod client;

pub use client::UserServiceClient;
