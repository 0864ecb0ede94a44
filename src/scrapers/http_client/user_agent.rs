//! User agent handling for HTTP requests.

use rand::seq::SliceRandom;

/// Real desktop browser user agents, rotated when none is pinned.
pub const BROWSER_USER_AGENTS: &[&str] = &[
    // Chrome on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36",
    // Safari on Mac
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_6_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
    // Chrome on Linux
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    // Firefox on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:126.0) Gecko/20100101 Firefox/126.0",
];

/// Pick a random browser user agent.
pub fn random_user_agent() -> &'static str {
    BROWSER_USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(BROWSER_USER_AGENTS[0])
}

/// Resolve the user agent for one attempt.
/// - None or empty => random browser user agent
/// - other => the pinned string
pub fn resolve_user_agent(pinned: Option<&str>) -> String {
    match pinned.map(str::trim) {
        Some(ua) if !ua.is_empty() => ua.to_string(),
        _ => random_user_agent().to_string(),
    }
}
