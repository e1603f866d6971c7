//! Configuration types for catalog-walker
//!
//! Defaults mirror the production catalog deployment: the main-menu and
//! exact-match search endpoints, the fixed search parameter set, and the
//! retry/backoff schedule the upstream API is known to tolerate. Every field
//! is serde-defaulted so a partial config file (or `Config::default()`) is
//! always valid.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration for a [`CategoryCrawler`](crate::CategoryCrawler)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream endpoint URLs
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// Search request parameters and facet selection
    #[serde(default)]
    pub search: SearchConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Retry and backoff settings
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Config {
    /// Validate the configuration, returning a [`Error::Config`] naming the
    /// offending key on the first problem found.
    pub fn validate(&self) -> Result<()> {
        validate_url("endpoints.tree_url", &self.endpoints.tree_url)?;
        validate_url("endpoints.search_url", &self.endpoints.search_url)?;

        if self.http.max_concurrent_fetches == 0 {
            return Err(Error::Config {
                message: "max_concurrent_fetches must be at least 1".to_string(),
                key: Some("http.max_concurrent_fetches".to_string()),
            });
        }

        if self.retry.max_attempts == 0 {
            return Err(Error::Config {
                message: "max_attempts must be at least 1".to_string(),
                key: Some("retry.max_attempts".to_string()),
            });
        }

        if self.search.category_facet_label.is_empty() {
            return Err(Error::Config {
                message: "category_facet_label must not be empty".to_string(),
                key: Some("search.category_facet_label".to_string()),
            });
        }

        Ok(())
    }
}

fn validate_url(key: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Config {
            message: format!("{key} must not be empty"),
            key: Some(key.to_string()),
        });
    }
    url::Url::parse(value).map_err(|e| Error::Config {
        message: format!("{key} is not a valid URL: {e}"),
        key: Some(key.to_string()),
    })?;
    Ok(())
}

/// Upstream endpoint URLs
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Endpoint returning the full initial category tree as JSON
    #[serde(default = "default_tree_url")]
    pub tree_url: String,

    /// Free-text search endpoint whose responses carry the category facet
    #[serde(default = "default_search_url")]
    pub search_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            tree_url: default_tree_url(),
            search_url: default_search_url(),
        }
    }
}

/// Search request parameters and facet selection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Fixed market/locale/region/display parameters sent with every search
    /// request. Opaque to the walker; the caller-supplied query string is
    /// merged in as the `query` parameter.
    #[serde(default = "default_search_params")]
    pub params: Vec<(String, String)>,

    /// Exact label of the filter entry that carries category leaf items.
    ///
    /// The upstream API identifies the facet by a locale-specific display
    /// name, so this is an exact, case-sensitive match. Configurable so a
    /// locale change does not require a code change.
    #[serde(default = "default_category_facet_label")]
    pub category_facet_label: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            params: default_search_params(),
            category_facet_label: default_category_facet_label(),
        }
    }
}

/// HTTP transport settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Maximum number of in-flight HTTP requests across all concurrent
    /// walker tasks (default: 64). The logical task fan-out is unbounded;
    /// this caps sockets, not tree expansion.
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: default_max_concurrent_fetches(),
        }
    }
}

/// Retry and backoff settings
///
/// The backoff is linear in the attempt number: after failed attempt `n` the
/// fetcher sleeps `backoff_base × n` (30 s, 60 s, 90 s, 120 s with defaults).
/// There is no sleep after the final attempt.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (default: 5)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay multiplied by the attempt number (default: 30 seconds)
    #[serde(default = "default_backoff_base", with = "duration_serde")]
    pub backoff_base: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base: default_backoff_base(),
        }
    }
}

fn default_tree_url() -> String {
    "https://static-basket-01.wbbasket.ru/vol0/data/main-menu-ru-ru-v3.json".to_string()
}

fn default_search_url() -> String {
    "https://search.wb.ru/exactmatch/sng/common/v14/search".to_string()
}

fn default_search_params() -> Vec<(String, String)> {
    [
        ("ab_testing", "false"),
        ("appType", "1"),
        ("curr", "rub"),
        ("dest", "-59202"),
        ("hide_dtype", "13"),
        ("lang", "ru"),
        ("resultset", "filters"),
        ("spp", "30"),
        ("suppressSpellcheck", "false"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_category_facet_label() -> String {
    "Категория".to_string()
}

fn default_max_concurrent_fetches() -> usize {
    64
}

fn default_max_attempts() -> u32 {
    5
}

fn default_backoff_base() -> Duration {
    Duration::from_secs(30)
}

// Duration serialization as plain seconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
