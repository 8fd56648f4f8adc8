// src/config.rs

use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use url::Url;

use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Which path the API exposes for liking a post.
/// Only one is ever used by a given client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LikeRoute {
    /// `/like/post/{id}/`
    #[default]
    Canonical,
    /// `/posts/{id}/like/`
    Legacy,
}

impl FromStr for LikeRoute {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "canonical" => Ok(LikeRoute::Canonical),
            "legacy" => Ok(LikeRoute::Legacy),
            other => Err(ClientError::Config(format!(
                "FEED_LIKE_ROUTE must be 'canonical' or 'legacy', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub like_route: LikeRoute,
    pub rust_log: String,
    pub log_dir: String,
}

impl Config {
    /// Loads `.env` (if present), then reads the process environment.
    pub fn from_env() -> Result<Self, ClientError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("FEED_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let like_route = lookup("FEED_LIKE_ROUTE")
            .unwrap_or_default()
            .parse::<LikeRoute>()?;

        let rust_log = lookup("RUST_LOG")
            .unwrap_or_else(|| "info".to_string());

        let log_dir = lookup("FEED_LOG_DIR")
            .unwrap_or_else(|| "logs".to_string());

        Ok(Self {
            base_url: parse_base_url(&base_url)?,
            like_route,
            rust_log,
            log_dir,
        })
    }

    /// Config pointing at `base_url` with every other field defaulted.
    pub fn for_base_url(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            like_route: LikeRoute::default(),
            rust_log: "info".to_string(),
            log_dir: "logs".to_string(),
        })
    }
}

/// Parses the API root. Anything that cannot carry path segments
/// (`mailto:`, `data:`) is refused up front.
pub fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(ClientError::Config(format!(
            "'{}' cannot be used as an API base URL",
            raw
        )));
    }
    Ok(url)
}
