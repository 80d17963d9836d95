//! Shared HTTP plumbing for the lookup clients.

use std::time::Duration;

use nearstore_core::AppConfig;
use reqwest::{Client, Url};

use crate::error::LookupError;

/// Transport settings shared by every lookup client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure on transient errors.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: "nearstore/0.1 (store-locator)".to_owned(),
            max_retries: 2,
            backoff_base_ms: 500,
        }
    }
}

impl HttpOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.http_timeout_secs,
            user_agent: config.http_user_agent.clone(),
            max_retries: config.http_max_retries,
            backoff_base_ms: config.http_retry_backoff_base_ms,
        }
    }
}

pub(crate) fn build_client(options: &HttpOptions) -> Result<Client, LookupError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(options.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(options.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// Parses `base_url`, forcing exactly one trailing slash so that
/// [`Url::join`] appends to the path instead of replacing its last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, LookupError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| LookupError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

pub(crate) fn join(base_url: &Url, path: &str) -> Result<Url, LookupError> {
    base_url.join(path).map_err(|e| LookupError::InvalidBaseUrl {
        base_url: base_url.to_string(),
        reason: e.to_string(),
    })
}
