//! Bounded backoff policy for waiting on asynchronous backend runs.
//!
//! ```rust
//! use std::time::Duration;
//! use tprovider::PollPolicy;
//!
//! let policy = PollPolicy::default().with_max_wait(Duration::from_secs(5));
//! assert_eq!(policy.interval_for_poll(1), Duration::from_millis(250));
//! assert!(policy.interval_for_poll(50) <= policy.max_interval);
//! ```

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub backoff_multiplier: f64,
    pub max_wait: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(250),
            max_interval: Duration::from_secs(2),
            backoff_multiplier: 1.5,
            max_wait: Duration::from_secs(60),
        }
    }
}

impl PollPolicy {
    pub fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }

    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Delay before the `poll`-th status check (1-based).
    pub fn interval_for_poll(&self, poll: u32) -> Duration {
        let exponent = poll.saturating_sub(1).min(64) as i32;
        let multiplier = self.backoff_multiplier.max(1.0);
        let unbounded = self.initial_interval.as_secs_f64() * multiplier.powi(exponent);
        Duration::from_secs_f64(unbounded.min(self.max_interval.as_secs_f64()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_interval_grows_and_caps() {
        let policy = PollPolicy {
            initial_interval: Duration::from_millis(100),
            max_interval: Duration::from_millis(250),
            backoff_multiplier: 2.0,
            max_wait: Duration::from_secs(1),
        };

        assert_eq!(policy.interval_for_poll(1), Duration::from_millis(100));
        assert_eq!(policy.interval_for_poll(2), Duration::from_millis(200));
        assert_eq!(policy.interval_for_poll(3), Duration::from_millis(250));
        assert_eq!(policy.interval_for_poll(40), Duration::from_millis(250));
    }

    #[test]
    fn shrinking_multiplier_is_treated_as_constant_interval() {
        let policy = PollPolicy {
            backoff_multiplier: 0.5,
            ..PollPolicy::default()
        };

        assert_eq!(policy.interval_for_poll(1), policy.interval_for_poll(5));
    }

    #[test]
    fn builder_helpers_override_defaults() {
        let policy = PollPolicy::default()
            .with_initial_interval(Duration::from_millis(10))
            .with_max_interval(Duration::from_millis(20))
            .with_max_wait(Duration::from_secs(3));

        assert_eq!(policy.initial_interval, Duration::from_millis(10));
        assert_eq!(policy.max_interval, Duration::from_millis(20));
        assert_eq!(policy.max_wait, Duration::from_secs(3));
    }
}
