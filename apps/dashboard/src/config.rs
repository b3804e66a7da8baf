use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Dashboard configuration loaded from environment variables.
/// Fails at startup if `BACKEND_URL` is missing or a numeric value is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the recruitment backend, without trailing slash.
    pub backend_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound for every backend call made by the coordinators.
    pub request_timeout: Duration,
    /// Upper bound for a match pass, which scores every candidate server-side.
    pub match_timeout: Duration,
    /// Page size for candidate, job and matching lists.
    pub page_size: u32,
    /// A client session untouched for this long is closed.
    pub session_idle_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let request_timeout = seconds_env("REQUEST_TIMEOUT_SECS", 30)?;
        let match_timeout = seconds_env("MATCH_TIMEOUT_SECS", 600)?;
        let session_idle_timeout = seconds_env("SESSION_IDLE_SECS", 1800)?;

        let page_size = std::env::var("PAGE_SIZE")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()
            .context("PAGE_SIZE must be a positive integer")?;
        if !(1..=100).contains(&page_size) {
            bail!("PAGE_SIZE must be between 1 and 100, got {page_size}");
        }

        Ok(Config {
            backend_url: normalize_base_url(&require_env("BACKEND_URL")?),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            request_timeout,
            match_timeout,
            page_size,
            session_idle_timeout,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn seconds_env(key: &str, default: u64) -> Result<Duration> {
    let secs = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .with_context(|| format!("{key} must be a whole number of seconds"))?;
    if secs == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
