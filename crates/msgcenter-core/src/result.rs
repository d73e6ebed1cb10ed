//! Convenience result type alias for the message center.

use crate::error::AppError;

/// A specialized `Result` type for message center operations.
pub type AppResult<T> = Result<T, AppError>;
