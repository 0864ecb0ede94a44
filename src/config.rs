//! Runtime configuration for the fetch and aggregate runs.
//!
//! The user-facing knobs (attempt budget, backoff bounds, window, rank
//! threshold, novelty flag) are populated by the CLI from arguments and
//! environment variables. Everything else keeps its default.

use std::time::Duration;

/// Default attempt budget per fetch.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 6;

/// Default initial backoff in seconds.
pub const DEFAULT_BASE_BACKOFF_SECS: f64 = 10.0;

/// Default backoff ceiling in seconds.
pub const DEFAULT_MAX_BACKOFF_SECS: f64 = 120.0;

/// Default aggregation window in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Default rank threshold ("low rank" means rank <= this).
pub const DEFAULT_MAX_RANK: u32 = 50;

/// Base URL used to absolutize product links.
pub const DEFAULT_BASE_URL: &str = "https://www.amazon.com";

/// Configuration for the resilient fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Total attempts before giving up (at least one).
    pub max_attempts: u32,
    /// Backoff value used after the first retryable failure.
    pub base_backoff: Duration,
    /// Ceiling for both the backoff value and any jittered wait.
    pub max_backoff: Duration,
    /// Multiplier applied to the backoff after every retryable failure.
    pub backoff_multiplier: f64,
    /// Upper bound of the random jitter added to a backoff wait.
    pub jitter_max: Duration,
    /// Politeness delay range applied before every attempt.
    pub politeness_min: Duration,
    pub politeness_max: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout.
    pub request_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: Duration::from_secs_f64(DEFAULT_BASE_BACKOFF_SECS),
            max_backoff: Duration::from_secs_f64(DEFAULT_MAX_BACKOFF_SECS),
            backoff_multiplier: 1.8,
            jitter_max: Duration::from_secs(5),
            politeness_min: Duration::from_millis(1200),
            politeness_max: Duration::from_millis(2800),
            connect_timeout: Duration::from_secs(15),
            request_timeout: Duration::from_secs(45),
        }
    }
}

impl FetchConfig {
    /// Defaults with the user-facing retry knobs overridden.
    pub fn with_retry_budget(
        max_attempts: u32,
        base_backoff_secs: f64,
        max_backoff_secs: f64,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_backoff: secs_to_duration(base_backoff_secs),
            max_backoff: secs_to_duration(max_backoff_secs),
            ..Self::default()
        }
    }

    /// A config with every random delay disabled. Waits then depend only on
    /// the backoff state and retry hints.
    pub fn without_jitter(mut self) -> Self {
        self.jitter_max = Duration::ZERO;
        self.politeness_min = Duration::ZERO;
        self.politeness_max = Duration::ZERO;
        self
    }
}

/// Seconds as a `Duration`, saturating instead of panicking.
///
/// Negative and NaN values become zero; values past `Duration::MAX`
/// (including infinity) become `Duration::MAX`.
pub fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Configuration for one aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateConfig {
    /// Trailing window of snapshots to load.
    pub window_days: u32,
    /// Items ranked at or below this are considered.
    pub max_rank: u32,
    /// Drop items already surfaced on an earlier day.
    pub new_only: bool,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            max_rank: DEFAULT_MAX_RANK,
            new_only: false,
        }
    }
}
