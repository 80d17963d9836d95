//! Postal code → coordinate resolution.

use std::sync::Arc;

use nearstore_core::Coordinate;

use crate::error::SearchError;
use crate::ports::{AddressLookup, AddressLookupError, CoordinateLookup, CoordinateLookupError};

/// Strips every non-digit character, e.g. `"52031-900"` → `"52031900"`.
#[must_use]
pub fn normalize_postal_code(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Composes the address and coordinate lookups into one resolution step.
#[derive(Clone)]
pub struct CoordinateResolver {
    addresses: Arc<dyn AddressLookup>,
    coordinates: Arc<dyn CoordinateLookup>,
}

impl CoordinateResolver {
    #[must_use]
    pub fn new(addresses: Arc<dyn AddressLookup>, coordinates: Arc<dyn CoordinateLookup>) -> Self {
        Self {
            addresses,
            coordinates,
        }
    }

    /// Resolves a postal code to a coordinate.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidPostalCode`] if the code has no digits, is not
    ///   found, or maps to an address missing street, locality, or region.
    /// - [`SearchError::GeocodingFailed`] if the address lookup itself fails or
    ///   the coordinate lookup yields no usable coordinate.
    pub async fn resolve(&self, postal_code: &str) -> Result<Coordinate, SearchError> {
        let normalized = normalize_postal_code(postal_code);
        if normalized.is_empty() {
            return Err(SearchError::InvalidPostalCode(postal_code.to_string()));
        }

        let address = match self.addresses.lookup(&normalized).await {
            Ok(address) => address,
            Err(AddressLookupError::NotFound(_)) => {
                return Err(SearchError::InvalidPostalCode(normalized));
            }
            Err(AddressLookupError::Lookup(reason)) => {
                tracing::warn!(postal_code = %normalized, error = %reason, "address lookup failed");
                return Err(SearchError::GeocodingFailed(reason));
            }
        };

        if !address.is_complete() {
            tracing::debug!(
                postal_code = %normalized,
                ?address,
                "incomplete address for postal code"
            );
            return Err(SearchError::InvalidPostalCode(normalized));
        }

        let free_text = address.free_text();
        let coordinate = self
            .coordinates
            .lookup(&free_text)
            .await
            .map_err(|e| match e {
                CoordinateLookupError::NoMatch(_) => {
                    SearchError::GeocodingFailed(format!("no match for '{free_text}'"))
                }
                CoordinateLookupError::Lookup(reason) => SearchError::GeocodingFailed(reason),
            })?;

        if !coordinate.is_valid() {
            return Err(SearchError::GeocodingFailed(format!(
                "unusable coordinate {coordinate} for '{free_text}'"
            )));
        }

        tracing::debug!(postal_code = %normalized, %coordinate, "resolved customer coordinate");
        Ok(coordinate)
    }
}
