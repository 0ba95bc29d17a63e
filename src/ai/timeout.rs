//! Request Timeouts
//!
//! Wraps an async operation in `tokio::time::timeout` and converts an elapsed
//! deadline into the caller's error type.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::ai::timeout::with_timeout;
//!
//! let reply = with_timeout(
//!     Duration::from_secs(60),
//!     transport.post_json(&url, &body),
//!     "generateContent request",
//! )
//! .await?;
//! ```

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// Deadline elapsed before the operation completed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} timed out after {}s", .timeout.as_secs())]
pub struct TimeoutElapsed {
    pub operation: String,
    pub timeout: Duration,
}

/// Execute an async operation with a timeout
///
/// Returns the operation's own result when it finishes in time, otherwise a
/// `TimeoutElapsed` converted into `E`.
pub async fn with_timeout<T, E, F>(
    timeout: Duration,
    future: F,
    operation_name: &str,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<TimeoutElapsed>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(TimeoutElapsed {
            operation: operation_name.to_string(),
            timeout,
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum TestError {
        Elapsed(TimeoutElapsed),
        Other,
    }

    impl From<TimeoutElapsed> for TestError {
        fn from(e: TimeoutElapsed) -> Self {
            Self::Elapsed(e)
        }
    }

    #[tokio::test]
    async fn test_with_timeout_success() {
        let result = with_timeout(
            Duration::from_secs(1),
            async { Ok::<_, TestError>(42) },
            "test operation",
        )
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_with_timeout_passes_inner_error_through() {
        let result = with_timeout(
            Duration::from_secs(1),
            async { Err::<u32, _>(TestError::Other) },
            "test operation",
        )
        .await;
        assert!(matches!(result, Err(TestError::Other)));
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result = with_timeout(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, TestError>(42)
            },
            "slow operation",
        )
        .await;

        match result {
            Err(TestError::Elapsed(e)) => {
                assert_eq!(e.operation, "slow operation");
                assert_eq!(e.timeout, Duration::from_millis(10));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
