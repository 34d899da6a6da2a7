use std::{fmt::Display, future::Future, time::Duration};

use backoff::{backoff::Backoff, ExponentialBackoff};

/// Bounded exponential-backoff retry.
///
/// The wait after failed attempt `k` is `multiplier * 2^(k-1)`, clamped to
/// `[min_delay, max_delay]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    multiplier: Duration,
    min_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    /// Three attempts, multiplier 1s, waits clamped to 2s..=10s
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            multiplier: Duration::from_secs(1),
            min_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, min_delay: Duration, max_delay: Duration) -> Self {
        RetryPolicy {
            max_attempts: max_attempts.max(1),
            min_delay,
            max_delay: max_delay.max(min_delay),
            ..Default::default()
        }
    }

    /// A policy that runs the operation once
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn with_multiplier(mut self, multiplier: Duration) -> Self {
        self.multiplier = multiplier;
        self
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.multiplier,
            initial_interval: self.multiplier,
            randomization_factor: 0.0,
            multiplier: 2.0,
            max_interval: self.max_delay,
            max_elapsed_time: None,
            ..Default::default()
        }
    }

    fn next_delay(&self, backoff: &mut ExponentialBackoff) -> Duration {
        backoff
            .next_backoff()
            .unwrap_or(self.max_delay)
            .clamp(self.min_delay, self.max_delay)
    }

    /// The waits taken between attempts when every attempt fails
    pub fn delays(&self) -> Vec<Duration> {
        let mut backoff = self.backoff();
        (1..self.max_attempts)
            .map(|_| self.next_delay(&mut backoff))
            .collect()
    }

    /// Runs `operation` until it succeeds or attempts run out, suspending the
    /// current task between attempts. The last failure is returned unchanged.
    pub async fn retry<T, E, F, Fut>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut backoff = self.backoff();
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts => {
                    let delay = self.next_delay(&mut backoff);
                    tracing::warn!(attempt, error = %e, ?delay, "Attempt failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(attempts = attempt, error = %e, "Retries exhausted");
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn test_default_delays_start_at_floor() {
        let secs = RetryPolicy::default()
            .delays()
            .iter()
            .map(Duration::as_secs)
            .collect::<Vec<_>>();
        assert_eq!(secs, [2, 2]);
    }

    #[test]
    fn test_delays_are_capped_at_ceiling() {
        let policy = RetryPolicy::new(6, Duration::from_secs(2), Duration::from_secs(10));
        let secs = policy
            .delays()
            .iter()
            .map(Duration::as_secs)
            .collect::<Vec<_>>();
        assert_eq!(secs, [2, 2, 4, 8, 10]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let start = tokio::time::Instant::now();

        let result = RetryPolicy::default()
            .retry(move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(format!("failure {n}"))
                } else {
                    Ok("digest")
                }
            })
            .await;

        assert_eq!(result, Ok("digest"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let waited = start.elapsed();
        assert!(waited >= Duration::from_secs(4) && waited < Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_last_failure_when_exhausted() {
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result: Result<(), String> = RetryPolicy::default()
            .retry(move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Err(format!("failure {n}"))
            })
            .await;

        assert_eq!(result, Err("failure 3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_multiplier_scales_waits_before_clamping() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1), Duration::from_secs(30))
            .with_multiplier(Duration::from_secs(3));
        let secs = policy
            .delays()
            .iter()
            .map(Duration::as_secs)
            .collect::<Vec<_>>();
        assert_eq!(secs, [3, 6, 12, 24]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_retry_runs_once() {
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result: Result<(), &str> = RetryPolicy::no_retry()
            .retry(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("boom")
            })
            .await;

        assert_eq!(result, Err("boom"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
