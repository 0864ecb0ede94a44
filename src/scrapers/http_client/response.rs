//! Fetched page wrapper.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::StatusCode;

/// Body fragments that mark a bot-challenge page, lower-cased.
const CHALLENGE_SIGNATURES: &[&str] = &[
    "captcha",
    "robot check",
    "/errors/validatecaptcha",
    "type the characters you see",
];

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub status: StatusCode,
    /// Header names are lower-cased.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl PageResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Add a header; the name is lower-cased.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Check if the response is successful.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Status codes that mean "slow down" rather than "no".
    pub fn is_rate_limit_status(&self) -> bool {
        matches!(
            self.status,
            StatusCode::TOO_MANY_REQUESTS | StatusCode::FORBIDDEN | StatusCode::SERVICE_UNAVAILABLE
        )
    }

    /// Whether the body is a bot-challenge page.
    pub fn is_bot_challenge(&self) -> bool {
        is_bot_challenge(&self.body)
    }

    /// `Retry-After` in whole seconds. HTTP-date values are ignored.
    pub fn retry_after(&self) -> Option<Duration> {
        let value = self.headers.get("retry-after")?.trim();
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        value.parse().ok().map(Duration::from_secs)
    }
}

/// Check page text for known bot-challenge signatures.
pub fn is_bot_challenge(html: &str) -> bool {
    let lower = html.to_lowercase();
    CHALLENGE_SIGNATURES.iter().any(|sig| lower.contains(sig))
}
