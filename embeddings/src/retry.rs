//! Retrying transient provider failures.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EmbeddingError, Result};
use crate::provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};

/// Exponential backoff policy for provider calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds.
    pub initial_backoff_ms: u64,

    /// Upper bound on an exponential backoff delay, in milliseconds.
    pub max_backoff_ms: u64,

    /// Upper bound on honoring a provider's `retry-after`, in milliseconds.
    pub max_rate_limit_wait_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 8_000,
            max_rate_limit_wait_ms: 60_000,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (starting at 0) after `error`.
    ///
    /// Rate limits wait for the provider's `retry-after`, capped by
    /// `max_rate_limit_wait_ms` rather than `max_backoff_ms`.
    pub fn delay_for(&self, attempt: u32, error: &EmbeddingError) -> Duration {
        let millis = match error {
            EmbeddingError::RateLimited { retry_after_secs } => retry_after_secs
                .saturating_mul(1000)
                .min(self.max_rate_limit_wait_ms),
            _ => self
                .initial_backoff_ms
                .saturating_mul(1u64.checked_shl(attempt).unwrap_or(u64::MAX))
                .min(self.max_backoff_ms),
        };
        Duration::from_millis(millis)
    }
}

/// A provider wrapper that retries retryable failures.
pub struct RetryingProvider<P> {
    provider: P,
    policy: RetryPolicy,
}

impl<P> RetryingProvider<P>
where
    P: EmbeddingProvider,
{
    /// Wrap `provider` with `policy`.
    pub fn new(provider: P, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// The active policy.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

#[async_trait]
impl<P> EmbeddingProvider for RetryingProvider<P>
where
    P: EmbeddingProvider,
{
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn default_model(&self) -> &str {
        self.provider.default_model()
    }

    fn default_dimension(&self) -> usize {
        self.provider.default_dimension()
    }

    fn settings_fingerprint(&self) -> String {
        self.provider.settings_fingerprint()
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        let mut attempt = 0;
        loop {
            match self.provider.embed(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() && attempt < self.policy.max_retries => {
                    let delay = self.policy.delay_for(attempt, &err);
                    attempt += 1;
                    warn!(
                        "{} request failed ({err}), retry {attempt}/{} in {delay:?}",
                        self.provider.name(),
                        self.policy.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn is_available(&self) -> bool {
        self.provider.is_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Replays scripted outcomes, then succeeds.
    struct FlakyProvider {
        failures: Mutex<Vec<EmbeddingError>>,
        calls: Mutex<u32>,
    }

    impl FlakyProvider {
        fn new(failures: Vec<EmbeddingError>) -> Self {
            Self {
                failures: Mutex::new(failures),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl EmbeddingProvider for FlakyProvider {
        fn name(&self) -> &str {
            "flaky"
        }

        fn default_model(&self) -> &str {
            "flaky-1"
        }

        fn default_dimension(&self) -> usize {
            1
        }

        async fn embed(&self, _request: EmbeddingRequest) -> Result<EmbeddingResponse> {
            *self.calls.lock().unwrap() += 1;
            let next = {
                let mut failures = self.failures.lock().unwrap();
                if failures.is_empty() {
                    None
                } else {
                    Some(failures.remove(0))
                }
            };
            match next {
                Some(err) => Err(err),
                None => Ok(EmbeddingResponse {
                    embedding: vec![1.0],
                    model: "flaky-1".to_string(),
                    dimension: 1,
                    tokens_used: None,
                }),
            }
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    fn instant(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_backoff_ms: 0,
            max_backoff_ms: 0,
            max_rate_limit_wait_ms: 0,
        }
    }

    fn server_error() -> EmbeddingError {
        EmbeddingError::ApiRequest {
            status: 500,
            message: "internal".to_string(),
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_retries: 5,
            initial_backoff_ms: 100,
            max_backoff_ms: 1_000,
            ..RetryPolicy::default()
        };
        let err = server_error();

        assert_eq!(policy.delay_for(0, &err), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1, &err), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3, &err), Duration::from_millis(800));
        assert_eq!(policy.delay_for(4, &err), Duration::from_millis(1_000));
        assert_eq!(policy.delay_for(80, &err), Duration::from_millis(1_000));
    }

    #[test]
    fn test_rate_limit_uses_retry_after() {
        let policy = RetryPolicy {
            max_retries: 1,
            initial_backoff_ms: 100,
            max_backoff_ms: 10_000,
            ..RetryPolicy::default()
        };
        let err = EmbeddingError::RateLimited { retry_after_secs: 2 };
        assert_eq!(policy.delay_for(0, &err), Duration::from_secs(2));
    }

    #[test]
    fn test_rate_limit_wait_is_not_bound_by_backoff_cap() {
        let policy = RetryPolicy::default();
        let throttled = EmbeddingError::RateLimited {
            retry_after_secs: 60,
        };
        assert_eq!(policy.delay_for(0, &throttled), Duration::from_secs(60));

        let long = EmbeddingError::RateLimited {
            retry_after_secs: 3_600,
        };
        assert_eq!(policy.delay_for(0, &long), Duration::from_secs(60));
        assert_eq!(
            policy.delay_for(10, &server_error()),
            Duration::from_millis(8_000)
        );
    }

    #[tokio::test]
    async fn test_recovers_from_transient_errors() {
        let provider = RetryingProvider::new(
            FlakyProvider::new(vec![
                server_error(),
                EmbeddingError::RateLimited { retry_after_secs: 0 },
            ]),
            instant(3),
        );

        let embedding = provider.get_embedding("x").await.unwrap();
        assert_eq!(embedding, vec![1.0]);
        assert_eq!(provider.provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let provider = RetryingProvider::new(
            FlakyProvider::new(vec![server_error(), server_error(), server_error()]),
            instant(2),
        );

        let err = provider.get_embedding("x").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::ApiRequest { status: 500, .. }));
        assert_eq!(provider.provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let provider = RetryingProvider::new(
            FlakyProvider::new(vec![EmbeddingError::ProviderNotConfigured(
                "flaky".to_string(),
            )]),
            instant(5),
        );

        assert!(provider.get_embedding("x").await.is_err());
        assert_eq!(provider.provider.calls(), 1);
    }
}
