//! `Correios` price-and-lead-time client.
//!
//! Posts a fixed 20×15×10 cm package to the public `precosEPrazosView`
//! endpoint and maps each returned service into a [`DeliveryQuote`].

use std::str::FromStr;

use async_trait::async_trait;
use nearstore_core::{AppConfig, DeliveryQuote};
use nearstore_engine::{ShippingQuoteError, ShippingQuoteProvider};
use reqwest::{Client, Url};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::http::{build_client, join, parse_base_url, HttpOptions};
use crate::retry::retry_with_backoff;

const DEFAULT_BASE_URL: &str = "https://www.correios.com.br/";
const QUOTE_PATH: &str = "@@precosEPrazosView";

const PACKAGE_LENGTH_CM: &str = "20";
const PACKAGE_WIDTH_CM: &str = "15";
const PACKAGE_HEIGHT_CM: &str = "10";

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct QuoteRequest<'a> {
    cep_destino: String,
    cep_origem: String,
    comprimento: &'a str,
    largura: &'a str,
    altura: &'a str,
}

impl QuoteRequest<'_> {
    fn new(origin: &str, destination: &str) -> Self {
        Self {
            cep_destino: destination.replace('-', ""),
            cep_origem: origin.replace('-', ""),
            comprimento: PACKAGE_LENGTH_CM,
            largura: PACKAGE_WIDTH_CM,
            altura: PACKAGE_HEIGHT_CM,
        }
    }
}

/// One service line (PAC, SEDEX, ...) in the `Correios` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceQuote {
    #[serde(default)]
    prazo: serde_json::Value,
    #[serde(default)]
    preco_agencia: serde_json::Value,
    #[serde(default)]
    url_titulo: String,
}

impl ServiceQuote {
    fn into_quote(self) -> Result<DeliveryQuote, LookupError> {
        let lead_time = match self.prazo {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        let price = format_price(&self.preco_agencia)?;
        Ok(DeliveryQuote::offer(lead_time, price, self.url_titulo))
    }
}

/// `"22,50"`, `"22.5"` or `22.5` → `"R$ 22.50"`.
fn format_price(raw: &serde_json::Value) -> Result<String, LookupError> {
    let text = match raw {
        serde_json::Value::String(s) => s.trim().replace(',', "."),
        serde_json::Value::Number(n) => n.to_string(),
        other => return Err(LookupError::Api(format!("unexpected price value: {other}"))),
    };
    let amount = Decimal::from_str(&text)
        .map_err(|e| LookupError::Api(format!("unparseable price \"{text}\": {e}")))?;
    Ok(format!("R$ {:.2}", amount.round_dp(2)))
}

pub struct CorreiosClient {
    client: Client,
    base_url: Url,
    options: HttpOptions,
}

impl CorreiosClient {
    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(options: HttpOptions) -> Result<Self, LookupError> {
        Self::with_base_url(options, DEFAULT_BASE_URL)
    }

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
    /// See [`CorreiosClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, LookupError> {
        Self::with_base_url(HttpOptions::from_app_config(config), &config.correios_base_url)
    }

    /// Quotes every service `Correios` offers between two postal codes, in
    /// response order. An empty response array yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`LookupError::Api`] if the body is not a JSON array or a price does not parse.
    /// - [`LookupError::Http`] / [`LookupError::UnexpectedStatus`] on transport failure.
    /// - [`LookupError::Deserialize`] if the body is not valid JSON.
    pub async fn calculate(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<DeliveryQuote>, LookupError> {
        let url = join(&self.base_url, QUOTE_PATH)?;
        let payload = QuoteRequest::new(origin, destination);
        let body = retry_with_backoff(
            "correios",
            self.options.max_retries,
            self.options.backoff_base_ms,
            || self.request(&url, &payload),
        )
        .await?;

        let context = || format!("correios(origin={origin}, destination={destination})");
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| LookupError::Deserialize {
                context: context(),
                source: e,
            })?;
        if !value.is_array() {
            return Err(LookupError::Api(format!(
                "expected an array of services, got: {value}"
            )));
        }
        let services: Vec<ServiceQuote> =
            serde_json::from_value(value).map_err(|e| LookupError::Deserialize {
                context: context(),
                source: e,
            })?;

        tracing::debug!(origin, destination, services = services.len(), "Correios quote received");
        services.into_iter().map(ServiceQuote::into_quote).collect()
    }

    async fn request(&self, url: &Url, payload: &QuoteRequest<'_>) -> Result<String, LookupError> {
        let response = self.client.post(url.clone()).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl ShippingQuoteProvider for CorreiosClient {
    async fn quote(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<DeliveryQuote>, ShippingQuoteError> {
        self.calculate(origin, destination)
            .await
            .map_err(|e| ShippingQuoteError::Provider(e.to_string()))
    }
}
