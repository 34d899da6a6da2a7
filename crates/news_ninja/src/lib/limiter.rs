use std::{
    collections::VecDeque,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

/// Sliding-window limiter admitting at most `max_admissions` callers per `window`.
///
/// One instance is meant to live for the whole process and be shared (via `Arc`)
/// by everything that calls the rate-limited feed. The lock is never held across
/// a suspension point.
#[derive(Debug)]
pub struct RateLimiter {
    max_admissions: usize,
    window: Duration,
    admitted: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_admissions: usize, window: Duration) -> Self {
        let max_admissions = max_admissions.max(1);
        RateLimiter {
            max_admissions,
            window,
            admitted: Mutex::new(VecDeque::with_capacity(max_admissions)),
        }
    }

    pub fn per_second(max_admissions: usize) -> Self {
        Self::new(max_admissions, Duration::from_secs(1))
    }

    pub fn max_admissions(&self) -> usize {
        self.max_admissions
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records an admission at `now` if capacity allows, otherwise returns how long
    /// to wait before the oldest admission leaves the window.
    pub fn try_admit_at(&self, now: Instant) -> Result<(), Duration> {
        let mut admitted = self.admitted.lock().unwrap_or_else(PoisonError::into_inner);

        while admitted
            .front()
            .is_some_and(|oldest| now.saturating_duration_since(*oldest) >= self.window)
        {
            admitted.pop_front();
        }

        if admitted.len() < self.max_admissions {
            admitted.push_back(now);
            return Ok(());
        }

        let oldest = admitted.front().copied().unwrap_or(now);
        Err(self.window - now.saturating_duration_since(oldest))
    }

    /// Suspends the current task until an admission is available.
    pub async fn acquire(&self) {
        loop {
            match self.try_admit_at(tokio::time::Instant::now().into_std()) {
                Ok(()) => return,
                Err(wait) => {
                    tracing::debug!(?wait, "Rate limit reached, suspending");
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}

impl Default for RateLimiter {
    /// Five admissions per second
    fn default() -> Self {
        Self::per_second(5)
    }
}
