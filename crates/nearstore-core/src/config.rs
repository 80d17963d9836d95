use crate::app_config::{AppConfig, CourierConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let google_api_key = require("GOOGLE_API_KEY")?;

    let env = parse_environment(&or_default("NEARSTORE_ENV", "development"))?;

    let bind_addr = parse_addr("NEARSTORE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("NEARSTORE_LOG_LEVEL", "info");
    let catalog_path = PathBuf::from(or_default("NEARSTORE_CATALOG_PATH", "./config/stores.yaml"));

    let viacep_base_url = or_default("NEARSTORE_VIACEP_BASE_URL", "https://viacep.com.br/");
    let geocoding_base_url = or_default(
        "NEARSTORE_GEOCODING_BASE_URL",
        "https://maps.googleapis.com/",
    );
    let correios_base_url = or_default(
        "NEARSTORE_CORREIOS_BASE_URL",
        "https://www.correios.com.br/",
    );

    let http_timeout_secs = parse_u64("NEARSTORE_HTTP_TIMEOUT_SECS", "15")?;
    let http_user_agent = or_default("NEARSTORE_HTTP_USER_AGENT", "nearstore/0.1 (store-locator)");
    let http_max_retries = parse_u32("NEARSTORE_HTTP_MAX_RETRIES", "2")?;
    let http_retry_backoff_base_ms = parse_u64("NEARSTORE_HTTP_RETRY_BACKOFF_BASE_MS", "500")?;

    let search_max_concurrent_stores =
        parse_usize("NEARSTORE_SEARCH_MAX_CONCURRENT_STORES", "8")?.max(1);
    let search_timeout_secs = parse_u64("NEARSTORE_SEARCH_TIMEOUT_SECS", "20")?;
    let quote_timeout_secs = parse_u64("NEARSTORE_QUOTE_TIMEOUT_SECS", "10")?;

    let defaults = CourierConfig::default();
    let courier = CourierConfig {
        price: or_default("NEARSTORE_COURIER_PRICE", &defaults.price),
        description: or_default("NEARSTORE_COURIER_DESCRIPTION", &defaults.description),
        lead_time_10km: or_default("NEARSTORE_COURIER_LEAD_TIME_10KM", &defaults.lead_time_10km),
        lead_time_30km: or_default("NEARSTORE_COURIER_LEAD_TIME_30KM", &defaults.lead_time_30km),
        lead_time_50km: or_default("NEARSTORE_COURIER_LEAD_TIME_50KM", &defaults.lead_time_50km),
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalog_path,
        google_api_key,
        viacep_base_url,
        geocoding_base_url,
        correios_base_url,
        http_timeout_secs,
        http_user_agent,
        http_max_retries,
        http_retry_backoff_base_ms,
        search_max_concurrent_stores,
        search_timeout_secs,
        quote_timeout_secs,
        courier,
    })
}

/// Parse `NEARSTORE_ENV` into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEARSTORE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
