//! Fetching and parsing of ranked category pages.

pub mod backoff;
mod capture;
pub mod error;
pub mod extract;
pub mod fetcher;
mod http_client;

pub use backoff::Backoff;
pub use capture::capture_snapshot;
pub use error::{FetchError, TransportError};
pub use extract::extract_items;
pub use fetcher::{classify, Attempt, Fetcher, Sleeper, TokioSleeper};
pub use http_client::{
    is_bot_challenge, random_user_agent, resolve_user_agent, HttpClient, PageResponse, Transport,
    BROWSER_USER_AGENTS,
};
