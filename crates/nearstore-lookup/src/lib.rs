//! HTTP implementations of the engine's lookup ports.
//!
//! | Port                    | Client              | Provider               |
//! |-------------------------|---------------------|------------------------|
//! | `AddressLookup`         | [`ViaCepClient`]    | `ViaCEP`               |
//! | `CoordinateLookup`      | [`GeocodingClient`] | Google Geocoding API   |
//! | `ShippingQuoteProvider` | [`CorreiosClient`]  | `Correios`             |

pub mod correios;
pub mod error;
pub mod geocoding;
mod http;
pub(crate) mod retry;
pub mod viacep;

use std::sync::Arc;
use std::time::Duration;

use nearstore_core::AppConfig;
use nearstore_engine::{
    CoordinateResolver, DeliveryRules, NearbySearch, SearchOptions, StoreCatalogReader,
};

pub use correios::CorreiosClient;
pub use error::LookupError;
pub use geocoding::GeocodingClient;
pub use http::HttpOptions;
pub use viacep::ViaCepClient;

/// The three production clients, built from one [`AppConfig`].
#[derive(Clone)]
pub struct LookupClients {
    pub addresses: Arc<ViaCepClient>,
    pub coordinates: Arc<GeocodingClient>,
    pub shipping: Arc<CorreiosClient>,
}

impl LookupClients {
    /// # Errors
    ///
    /// Returns the first [`LookupError`] raised while building a client.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, LookupError> {
        Ok(Self {
            addresses: Arc::new(ViaCepClient::from_app_config(config)?),
            coordinates: Arc::new(GeocodingClient::from_app_config(config)?),
            shipping: Arc::new(CorreiosClient::from_app_config(config)?),
        })
    }

    /// Coordinate resolver backed by `ViaCEP` and Google Geocoding.
    #[must_use]
    pub fn resolver(&self) -> CoordinateResolver {
        CoordinateResolver::new(self.addresses.clone(), self.coordinates.clone())
    }

    /// Wires the clients and `catalog` into a ready-to-use search.
    #[must_use]
    pub fn nearby_search(
        &self,
        config: &AppConfig,
        catalog: Arc<dyn StoreCatalogReader>,
    ) -> NearbySearch {
        let rules = DeliveryRules::new(
            config.courier.clone(),
            self.shipping.clone(),
            Duration::from_secs(config.quote_timeout_secs),
        );
        NearbySearch::new(
            catalog,
            self.resolver(),
            rules,
            SearchOptions::from_app_config(config),
        )
    }
}
