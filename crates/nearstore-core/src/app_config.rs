use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Fixed strings used for local-courier quotes.
///
/// Lead times are banded by distance (≤10 km, ≤30 km, ≤50 km); the band
/// thresholds themselves are not configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourierConfig {
    pub price: String,
    pub description: String,
    pub lead_time_10km: String,
    pub lead_time_30km: String,
    pub lead_time_50km: String,
}

impl Default for CourierConfig {
    fn default() -> Self {
        Self {
            price: "R$ 15,00".to_string(),
            description: "local courier".to_string(),
            lead_time_10km: "1 dia útil".to_string(),
            lead_time_30km: "2 dias úteis".to_string(),
            lead_time_50km: "3 dias úteis".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub catalog_path: PathBuf,
    pub google_api_key: String,
    pub viacep_base_url: String,
    pub geocoding_base_url: String,
    pub correios_base_url: String,
    pub http_timeout_secs: u64,
    pub http_user_agent: String,
    pub http_max_retries: u32,
    pub http_retry_backoff_base_ms: u64,
    pub search_max_concurrent_stores: usize,
    pub search_timeout_secs: u64,
    pub quote_timeout_secs: u64,
    pub courier: CourierConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("catalog_path", &self.catalog_path)
            .field("google_api_key", &"[redacted]")
            .field("viacep_base_url", &self.viacep_base_url)
            .field("geocoding_base_url", &self.geocoding_base_url)
            .field("correios_base_url", &self.correios_base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("http_user_agent", &self.http_user_agent)
            .field("http_max_retries", &self.http_max_retries)
            .field(
                "http_retry_backoff_base_ms",
                &self.http_retry_backoff_base_ms,
            )
            .field(
                "search_max_concurrent_stores",
                &self.search_max_concurrent_stores,
            )
            .field("search_timeout_secs", &self.search_timeout_secs)
            .field("quote_timeout_secs", &self.quote_timeout_secs)
            .field("courier", &self.courier)
            .finish()
    }
}
