//! Google Geocoding API client: free-text address → coordinate.

use async_trait::async_trait;
use nearstore_core::{AppConfig, Coordinate};
use nearstore_engine::{CoordinateLookup, CoordinateLookupError};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::LookupError;
use crate::http::{build_client, join, parse_base_url, HttpOptions};
use crate::retry::retry_with_backoff;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";
const GEOCODE_PATH: &str = "maps/api/geocode/json";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

pub struct GeocodingClient {
    client: Client,
    api_key: String,
    base_url: Url,
    options: HttpOptions,
}

impl GeocodingClient {
    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, options: HttpOptions) -> Result<Self, LookupError> {
        Self::with_base_url(api_key, options, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`LookupError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        options: HttpOptions,
        base_url: &str,
    ) -> Result<Self, LookupError> {
        Ok(Self {
            client: build_client(&options)?,
            api_key: api_key.to_owned(),
            base_url: parse_base_url(base_url)?,
            options,
        })
    }

    /// # Errors
    ///
    /// See [`GeocodingClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, LookupError> {
        Self::with_base_url(
            &config.google_api_key,
            HttpOptions::from_app_config(config),
            &config.geocoding_base_url,
        )
    }

    /// Geocodes `address` and returns the first match.
    ///
    /// `Ok(None)` means the API answered `ZERO_RESULTS`.
    ///
    /// # Errors
    ///
    /// - [`LookupError::Api`] for any status other than `OK` / `ZERO_RESULTS`
    ///   (`REQUEST_DENIED`, `OVER_QUERY_LIMIT`, ...).
    /// - [`LookupError::Http`] / [`LookupError::UnexpectedStatus`] on transport failure.
    /// - [`LookupError::Deserialize`] if the body is not the expected JSON.
    pub async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, LookupError> {
        let url = self.build_url(address)?;
        let body = retry_with_backoff(
            "geocoding",
            self.options.max_retries,
            self.options.backoff_base_ms,
            || self.request(&url),
        )
        .await?;

        let parsed: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| LookupError::Deserialize {
                context: format!("geocode(address={address})"),
                source: e,
            })?;

        match parsed.status.as_str() {
            "OK" => Ok(parsed
                .results
                .into_iter()
                .next()
                .map(|r| Coordinate::new(r.geometry.location.lat, r.geometry.location.lng))),
            "ZERO_RESULTS" => Ok(None),
            other => Err(LookupError::Api(match parsed.error_message {
                Some(message) => format!("{other}: {message}"),
                None => other.to_owned(),
            })),
        }
    }

    fn build_url(&self, address: &str) -> Result<Url, LookupError> {
        let mut url = join(&self.base_url, GEOCODE_PATH)?;
        url.query_pairs_mut()
            .append_pair("address", address)
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn request(&self, url: &Url) -> Result<String, LookupError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            // The key travels in the query string; keep it out of errors and logs.
            let mut redacted = url.clone();
            redacted.set_query(None);
            return Err(LookupError::UnexpectedStatus {
                status: status.as_u16(),
                url: redacted.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl CoordinateLookup for GeocodingClient {
    async fn lookup(&self, address: &str) -> Result<Coordinate, CoordinateLookupError> {
        match self.geocode(address).await {
            Ok(Some(coordinate)) => Ok(coordinate),
            Ok(None) => Err(CoordinateLookupError::NoMatch(address.to_owned())),
            Err(e) => {
                tracing::error!(address, error = %e, "geocoding failed");
                Err(CoordinateLookupError::Lookup(e.to_string()))
            }
        }
    }
}
