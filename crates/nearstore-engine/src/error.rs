use thiserror::Error;

/// Errors that abort a whole search. Per-store problems never surface here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The postal code is malformed or does not resolve to a complete address.
    #[error("invalid postal code: {0}")]
    InvalidPostalCode(String),

    /// No usable coordinate could be produced for the customer's address.
    #[error("geocoding failed: {0}")]
    GeocodingFailed(String),

    /// The store catalog could not be read.
    #[error("store catalog unavailable: {0}")]
    CatalogUnavailable(String),
}

impl SearchError {
    /// Stable machine-readable code, used by the HTTP layer.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            SearchError::InvalidPostalCode(_) => "invalid_postal_code",
            SearchError::GeocodingFailed(_) => "geocoding_failed",
            SearchError::CatalogUnavailable(_) => "catalog_unavailable",
        }
    }
}
