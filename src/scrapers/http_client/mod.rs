//! HTTP transport for category page fetches.

mod response;
mod user_agent;

pub use response::{is_bot_challenge, PageResponse};
pub use user_agent::{random_user_agent, resolve_user_agent, BROWSER_USER_AGENTS};

use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, DNT, PRAGMA, REFERER, UPGRADE_INSECURE_REQUESTS,
    USER_AGENT,
};
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::error::TransportError;
use crate::config::FetchConfig;

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Performs one GET and reads the whole body.
///
/// The fetcher only talks to this trait, so tests substitute a scripted
/// implementation for the network.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, user_agent: &str) -> Result<PageResponse, TransportError>;
}

/// reqwest-backed transport with browser-like request headers.
///
/// Cookies persist across requests made with the same client, so reuse one
/// instance for every attempt of a run.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(config: &FetchConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

/// `scheme://host/` of the requested page, used as the Referer.
fn origin_referer(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(format!("{}/", origin.ascii_serialization()))
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &str, user_agent: &str) -> Result<PageResponse, TransportError> {
        let mut request = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .header(DNT, "1")
            .header(UPGRADE_INSECURE_REQUESTS, "1");
        if let Some(referer) = origin_referer(url) {
            request = request.header(REFERER, referer);
        }

        let start = Instant::now();
        let response = request.send().await?;
        let status = response.status();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.to_string(), v.to_string());
            }
        }

        let body = response.text().await?;
        debug!(
            "GET {} -> {} ({} bytes in {:?})",
            url,
            status.as_u16(),
            body.len(),
            start.elapsed()
        );

        Ok(PageResponse {
            status,
            headers,
            body,
        })
    }
}
