//! `ViaCEP` postal-code → street address client.

use async_trait::async_trait;
use nearstore_core::AppConfig;
use nearstore_engine::{AddressLookup, AddressLookupError, PostalAddress};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::error::LookupError;
use crate::http::{build_client, join, parse_base_url, HttpOptions};
use crate::retry::retry_with_backoff;

const DEFAULT_BASE_URL: &str = "https://viacep.com.br/";

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    erro: Option<serde_json::Value>,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
}

impl ViaCepResponse {
    /// `ViaCEP` flags unknown codes with `"erro": true` (older API) or
    /// `"erro": "true"` (current API) on an HTTP 200.
    fn is_error(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

pub struct ViaCepClient {
    client: Client,
    base_url: Url,
    options: HttpOptions,
}

impl ViaCepClient {
    /// Creates a client pointed at the public `ViaCEP` service.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(options: HttpOptions) -> Result<Self, LookupError> {
        Self::with_base_url(options, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`LookupError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(options: HttpOptions, base_url: &str) -> Result<Self, LookupError> {
        Ok(Self {
            client: build_client(&options)?,
            base_url: parse_base_url(base_url)?,
            options,
        })
    }

    /// # Errors
    ///
    /// See [`ViaCepClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, LookupError> {
        Self::with_base_url(HttpOptions::from_app_config(config), &config.viacep_base_url)
    }

    /// Fetches the address for an 8-digit postal code.
    ///
    /// Returns `Ok(None)` when `ViaCEP` does not know the code, or when the code
    /// is not 8 digits (no request is made in that case).
    ///
    /// # Errors
    ///
    /// - [`LookupError::Http`] on network failure after retries.
    /// - [`LookupError::UnexpectedStatus`] for non-2xx statuses other than 400.
    /// - [`LookupError::Deserialize`] if the body is not the expected JSON.
    pub async fn get_address(
        &self,
        postal_code: &str,
    ) -> Result<Option<PostalAddress>, LookupError> {
        if postal_code.len() != 8 || !postal_code.bytes().all(|b| b.is_ascii_digit()) {
            tracing::debug!(postal_code, "postal code is not 8 digits; skipping ViaCEP");
            return Ok(None);
        }

        let url = join(&self.base_url, &format!("ws/{postal_code}/json/"))?;
        let body = retry_with_backoff(
            "viacep",
            self.options.max_retries,
            self.options.backoff_base_ms,
            || self.request(&url),
        )
        .await?;

        let Some(body) = body else {
            return Ok(None);
        };
        let parsed: ViaCepResponse =
            serde_json::from_str(&body).map_err(|e| LookupError::Deserialize {
                context: format!("viacep(cep={postal_code})"),
                source: e,
            })?;

        if parsed.is_error() {
            tracing::debug!(postal_code, "ViaCEP reports unknown postal code");
            return Ok(None);
        }

        Ok(Some(PostalAddress {
            street: parsed.logradouro,
            locality: parsed.localidade,
            region: parsed.uf,
        }))
    }

    /// `Ok(None)` for HTTP 400, which `ViaCEP` returns for malformed codes.
    async fn request(&self, url: &Url) -> Result<Option<String>, LookupError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LookupError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(Some(response.text().await?))
    }
}

#[async_trait]
impl AddressLookup for ViaCepClient {
    async fn lookup(&self, postal_code: &str) -> Result<PostalAddress, AddressLookupError> {
        match self.get_address(postal_code).await {
            Ok(Some(address)) => Ok(address),
            Ok(None) => Err(AddressLookupError::NotFound(postal_code.to_owned())),
            Err(e) => {
                tracing::error!(postal_code, error = %e, "ViaCEP lookup failed");
                Err(AddressLookupError::Lookup(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ViaCepResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn error_flag_accepts_bool_and_string() {
        assert!(parse(r#"{"erro": true}"#).is_error());
        assert!(parse(r#"{"erro": "true"}"#).is_error());
        let complete = r#"{"logradouro": "Rua A", "localidade": "Recife", "uf": "PE"}"#;
        assert!(!parse(complete).is_error());
    }

    #[tokio::test]
    async fn malformed_code_short_circuits() {
        let client = ViaCepClient::with_base_url(HttpOptions::default(), "http://127.0.0.1:1")
            .expect("client builds");
        assert_eq!(client.get_address("1234").await.unwrap(), None);
        assert_eq!(client.get_address("5003190a").await.unwrap(), None);
    }
}
