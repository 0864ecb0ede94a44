//! Exponential backoff state for one fetch.
//!
//! A `Backoff` is a plain value: the retry loop owns it and replaces it
//! with `grow()` after every retryable failure. Nothing is shared between
//! fetches.

use std::time::Duration;

use rand::Rng;

use crate::config::{secs_to_duration, FetchConfig};

/// Current backoff interval with its growth rule and ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    current: Duration,
    max: Duration,
    multiplier: f64,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration, multiplier: f64) -> Self {
        Self {
            current: base.min(max),
            max,
            multiplier,
        }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(config.base_backoff, config.max_backoff, config.backoff_multiplier)
    }

    /// Current interval, before jitter.
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Wait for this step: current interval plus jitter, capped at the ceiling.
    pub fn wait(&self, jitter: Duration) -> Duration {
        self.current.saturating_add(jitter).min(self.max)
    }

    /// Next state: interval multiplied, capped at the ceiling.
    pub fn grow(self) -> Self {
        let grown = secs_to_duration(self.current.as_secs_f64() * self.multiplier);
        Self {
            current: grown.min(self.max),
            ..self
        }
    }
}

/// Uniform random duration in `[min, max)`; `min` when the range is empty.
pub fn random_between(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    let secs = rand::thread_rng().gen_range(min.as_secs_f64()..max.as_secs_f64());
    secs_to_duration(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_is_multiplicative_and_capped() {
        let backoff = Backoff::new(Duration::from_secs(10), Duration::from_secs(30), 1.8);
        let second = backoff.grow();
        assert_eq!(second.current(), Duration::from_secs(18));
        let third = second.grow();
        assert_eq!(third.current(), Duration::from_secs(30));
        assert_eq!(third.grow().current(), Duration::from_secs(30));
    }

    #[test]
    fn test_wait_adds_jitter_under_ceiling() {
        let backoff = Backoff::new(Duration::from_secs(10), Duration::from_secs(12), 2.0);
        assert_eq!(backoff.wait(Duration::ZERO), Duration::from_secs(10));
        assert_eq!(backoff.wait(Duration::from_secs(1)), Duration::from_secs(11));
        assert_eq!(backoff.wait(Duration::from_secs(5)), Duration::from_secs(12));
    }

    #[test]
    fn test_base_above_ceiling_is_clamped() {
        let backoff = Backoff::new(Duration::from_secs(60), Duration::from_secs(20), 2.0);
        assert_eq!(backoff.current(), Duration::from_secs(20));
    }

    #[test]
    fn test_huge_ceiling_saturates() {
        let backoff = Backoff::new(Duration::MAX, Duration::MAX, 1.8);
        assert_eq!(backoff.grow().current(), Duration::MAX);
        assert_eq!(backoff.wait(Duration::from_secs(5)), Duration::MAX);
    }

    #[test]
    fn test_random_between_bounds() {
        assert_eq!(random_between(Duration::ZERO, Duration::ZERO), Duration::ZERO);
        let min = Duration::from_millis(1200);
        let max = Duration::from_millis(2800);
        for _ in 0..50 {
            let d = random_between(min, max);
            assert!(d >= min && d < max);
        }
    }
}
