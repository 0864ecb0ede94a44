//! Resilient fetcher for bot-hostile listing pages.
//!
//! Every attempt is preceded by a small random politeness delay. Responses
//! are classified into success, blocked (429/403/503 or a bot-challenge
//! body), network failure, or terminal failure. Blocked and network
//! failures share one backoff state and one attempt budget; terminal
//! failures are returned at once.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::backoff::{random_between, Backoff};
use super::error::{FetchError, TransportError};
use super::http_client::{resolve_user_agent, PageResponse, Transport};
use crate::config::FetchConfig;

/// Blocking wait between attempts. Tests substitute a recording fake.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Classified outcome of a single attempt.
#[derive(Debug)]
pub enum Attempt {
    Success(String),
    Blocked {
        status: u16,
        challenge: bool,
        retry_after: Option<Duration>,
    },
    Network(String),
    Terminal(u16),
}

/// Classify one transport result.
pub fn classify(result: Result<PageResponse, TransportError>) -> Attempt {
    let page = match result {
        Ok(page) => page,
        Err(e) => return Attempt::Network(e.to_string()),
    };

    let challenge = page.is_bot_challenge();
    if page.is_rate_limit_status() || challenge {
        return Attempt::Blocked {
            status: page.status.as_u16(),
            challenge,
            retry_after: page.retry_after(),
        };
    }

    if page.is_success() {
        Attempt::Success(page.body)
    } else {
        Attempt::Terminal(page.status.as_u16())
    }
}

/// Fetches one URL with politeness delays and bounded retries.
pub struct Fetcher<T, S = TokioSleeper> {
    transport: T,
    sleeper: S,
    config: FetchConfig,
}

impl<T: Transport> Fetcher<T, TokioSleeper> {
    pub fn new(transport: T, config: FetchConfig) -> Self {
        Self::with_sleeper(transport, TokioSleeper, config)
    }
}

impl<T: Transport, S: Sleeper> Fetcher<T, S> {
    pub fn with_sleeper(transport: T, sleeper: S, config: FetchConfig) -> Self {
        Self {
            transport,
            sleeper,
            config,
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch page HTML, retrying blocked and network failures.
    ///
    /// `user_agent` pins the User-Agent; `None` rotates browser agents per
    /// attempt. Returns the last retryable error once the budget is spent.
    pub async fn fetch(&self, url: &str, user_agent: Option<&str>) -> Result<String, FetchError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut backoff = Backoff::from_config(&self.config);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            let agent = resolve_user_agent(user_agent);
            let politeness = random_between(self.config.politeness_min, self.config.politeness_max);
            self.sleeper.sleep(politeness).await;

            debug!("Fetching {} (attempt {}/{})", url, attempt, max_attempts);
            let wait = match classify(self.transport.get(url, &agent).await) {
                Attempt::Success(body) => {
                    info!("Fetched {} on attempt {}/{}", url, attempt, max_attempts);
                    return Ok(body);
                }
                Attempt::Terminal(status) => {
                    warn!("HTTP {} from {}, not retrying", status, url);
                    return Err(FetchError::Terminal {
                        url: url.to_string(),
                        status,
                    });
                }
                Attempt::Blocked {
                    status,
                    challenge,
                    retry_after,
                } => {
                    let wait = retry_after.unwrap_or_else(|| backoff.wait(self.jitter()));
                    warn!(
                        "Got {}{} from {}. Attempt {}/{}. Waiting {:.1}s",
                        status,
                        if challenge { " (bot challenge)" } else { "" },
                        url,
                        attempt,
                        max_attempts,
                        wait.as_secs_f64()
                    );
                    last_error = Some(FetchError::Blocked {
                        url: url.to_string(),
                        status,
                        challenge,
                        attempts: attempt,
                    });
                    wait
                }
                Attempt::Network(message) => {
                    let wait = backoff.wait(self.jitter());
                    warn!(
                        "Request error on attempt {}/{} for {}: {}. Waiting {:.1}s",
                        attempt,
                        max_attempts,
                        url,
                        message,
                        wait.as_secs_f64()
                    );
                    last_error = Some(FetchError::Network {
                        url: url.to_string(),
                        message,
                        attempts: attempt,
                    });
                    wait
                }
            };

            backoff = backoff.grow();
            if attempt < max_attempts {
                self.sleeper.sleep(wait).await;
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::Network {
            url: url.to_string(),
            message: "no fetch attempts were made".to_string(),
            attempts: 0,
        }))
    }

    fn jitter(&self) -> Duration {
        random_between(Duration::ZERO, self.config.jitter_max)
    }
}
