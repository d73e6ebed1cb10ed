//! Request context carrying the acting user and a cancellation token.

use tokio_util::sync::CancellationToken;

use msgcenter_core::error::AppError;
use msgcenter_core::result::AppResult;

/// Context for the current request.
///
/// Passed into every service method so that each operation knows *who* is
/// acting and can be abandoned when the caller goes away.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Internal user id; scopes follow-channel queries.
    pub user_id: String,
    /// Owner name recorded on subscriptions.
    pub user_name: String,
    /// Cancelled when the caller abandons the request.
    pub cancel: CancellationToken,
}

impl RequestContext {
    /// Creates a new request context with a fresh cancellation token.
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the cancellation token, e.g. with a child of a shutdown token.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Runs `fut` unless the request is cancelled first.
    ///
    /// The future is dropped on cancellation, which aborts the in-flight
    /// store call and rolls back any open transaction.
    pub async fn run<T, F>(&self, operation: &str, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(AppError::cancelled(format!("{operation} cancelled")));
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                Err(AppError::cancelled(format!("{operation} cancelled")))
            }
            result = fut => result,
        }
    }
}
