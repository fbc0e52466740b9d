use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::client::ClientError;

/// Retry behaviour for write operations.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub delays_secs: Vec<u64>,
}

impl RetryConfig {
    /// No retries: the first result is final. Used in tests.
    pub fn none() -> Self {
        Self {
            delays_secs: Vec::new(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delays_secs: vec![1, 2],
        }
    }
}

/// Run a write with backoff. Retries on transport errors and server-side
/// failures; returns immediately on success or a non-retryable error.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, mut op: F) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let max_attempts = config.delays_secs.len() + 1;
    for attempt in 0..max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < config.delays_secs.len() => {
                let delay = config.delays_secs[attempt];
                warn!(
                    "write attempt {}/{} failed ({e}), retrying in {delay}s",
                    attempt + 1,
                    max_attempts,
                );
                tokio::time::sleep(Duration::from_secs(delay)).await;
            }
            Err(e) => return Err(e),
        }
    }
    unreachable!()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::cell::Cell;

    fn server_error() -> ClientError {
        ClientError::Backend {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".to_string(),
        }
    }

    #[tokio::test]
    async fn returns_first_success() {
        let calls = Cell::new(0);
        let result = with_retry(&RetryConfig::none(), || {
            calls.set(calls.get() + 1);
            async { Ok::<_, ClientError>(7) }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_retryable_errors_until_delays_exhausted() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retry(
            &RetryConfig {
                delays_secs: vec![1, 1],
            },
            || {
                calls.set(calls.get() + 1);
                async { Err(server_error()) }
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn does_not_retry_non_retryable_errors() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retry(&RetryConfig::default(), || {
            calls.set(calls.get() + 1);
            async { Err(ClientError::NotFound) }
        })
        .await;
        assert!(matches!(result, Err(ClientError::NotFound)));
        assert_eq!(calls.get(), 1);
    }
}
