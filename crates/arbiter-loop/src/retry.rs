// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Bounded Provider Retry
// ─────────────────────────────────────────────────────────────────────

use std::future::Future;
use std::time::Duration;

use arbiter_types::{ProviderError, RetryPolicy};

/// Delay before retry number `attempt` (0-based), randomized by
/// `±policy.jitter` of the capped exponential delay.
pub fn backoff_with_jitter(policy: &RetryPolicy, attempt: u32) -> Duration {
    let capped = policy.base_backoff(attempt).as_millis() as f64;
    let jitter_range = capped * policy.jitter;
    let jitter_offset = rand::random::<f64>() * jitter_range * 2.0 - jitter_range;
    Duration::from_millis((capped + jitter_offset).max(0.0) as u64)
}

/// Run `call` until it succeeds, fails non-transiently, or
/// `policy.max_attempts` is spent. The last error is returned as is.
pub async fn run_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut call: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt + 1 < max_attempts => {
                let delay = backoff_with_jitter(policy, attempt);
                log::warn!(
                    "{operation}: attempt {}/{max_attempts} failed ({err}); retrying in {delay:?}",
                    attempt + 1
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                if err.is_transient() {
                    log::warn!("{operation}: giving up after {max_attempts} attempts ({err})");
                }
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            ..RetryPolicy::default()
        }
    }

    #[test]
    fn test_backoff_within_jitter_bounds() {
        let policy = RetryPolicy::default();
        for attempt in 0..6 {
            let base = policy.base_backoff(attempt).as_millis() as f64;
            let got = backoff_with_jitter(&policy, attempt).as_millis() as f64;
            assert!(got >= (base * 0.9).floor() - 1.0, "attempt {attempt}: {got} < {base}");
            assert!(got <= base * 1.1 + 1.0, "attempt {attempt}: {got} > {base}");
        }
    }

    #[test]
    fn test_backoff_capped() {
        let policy = RetryPolicy {
            jitter: 0.0,
            ..RetryPolicy::default()
        };
        assert_eq!(backoff_with_jitter(&policy, 0), Duration::from_millis(500));
        assert_eq!(backoff_with_jitter(&policy, 1), Duration::from_millis(1000));
        assert_eq!(backoff_with_jitter(&policy, 10), Duration::from_millis(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_retried_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = run_with_retry(&policy(3), "test", move || async move {
            match calls.fetch_add(1, Ordering::SeqCst) {
                0 => Err(ProviderError::RateLimited("429".into())),
                1 => Err(ProviderError::TimedOut("30s".into())),
                _ => Ok("done"),
            }
        })
        .await;
        assert_eq!(result.unwrap(), "done");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_last_error() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), _> = run_with_retry(&policy(3), "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Transient("503".into()))
        })
        .await;
        assert_eq!(result.unwrap_err(), ProviderError::Transient("503".into()));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_schema_error_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), _> = run_with_retry(&policy(5), "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Schema("bad json".into()))
        })
        .await;
        assert!(matches!(result, Err(ProviderError::Schema(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sleeps_between_attempts() {
        let start = tokio::time::Instant::now();
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let no_jitter = RetryPolicy {
            jitter: 0.0,
            ..policy(3)
        };
        let _: Result<(), _> = run_with_retry(&no_jitter, "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Transient("503".into()))
        })
        .await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1500), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(1600), "{elapsed:?}");
    }
}
