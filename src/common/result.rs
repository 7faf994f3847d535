use crate::common::error::SvnError;

/// Result alias used across the crate.
pub type SvnResult<T> = Result<T, SvnError>;

/// Helpers for async operations.
pub mod async_helpers {
    use super::{SvnError, SvnResult};
    use std::future::Future;
    use std::time::Duration;

    /// Run `f` under a deadline; expiry maps to [`SvnError::Timeout`].
    pub async fn with_timeout<F, T>(f: F, deadline: Duration) -> SvnResult<T>
    where
        F: Future<Output = SvnResult<T>>,
    {
        match tokio::time::timeout(deadline, f).await {
            Ok(result) => result,
            Err(_) => Err(SvnError::timeout(deadline)),
        }
    }
}
