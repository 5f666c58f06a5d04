use std::time::{Duration, Instant};

use dashmap::DashMap;

const MAX_ATTEMPTS: u32 = 5;
const WINDOW: Duration = Duration::from_secs(15 * 60);

/// Per-email brute force limiter for the token endpoint.
pub struct LoginRateLimiter {
    /// email -> (attempt_count, window_start)
    entries: DashMap<String, (u32, Instant)>,
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginRateLimiter {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Count a token request against the email, 5 per 15 minutes. Checked and
    /// incremented under one entry lock. Returns the seconds left in the window
    /// when the limit is reached. Call `reset()` after a successful login.
    pub fn try_attempt(&self, email: &str) -> Result<(), u64> {
        self.try_attempt_at(email, Instant::now())
    }

    fn try_attempt_at(&self, email: &str, now: Instant) -> Result<(), u64> {
        let mut entry = self.entries.entry(email.to_lowercase()).or_insert((0, now));
        let (count, start) = entry.value_mut();

        if now.duration_since(*start) > WINDOW {
            *count = 0;
            *start = now;
        }

        if *count >= MAX_ATTEMPTS {
            let elapsed = now.duration_since(*start).as_secs();
            return Err(WINDOW.as_secs().saturating_sub(elapsed));
        }

        *count += 1;
        Ok(())
    }

    /// Forget attempts for an email after a successful login.
    pub fn reset(&self, email: &str) {
        self.entries.remove(&email.to_lowercase());
    }

    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.entries.retain(|_, (_, start)| now.duration_since(*start) < max_age);
    }
}
