//! Collaborator ports.
//!
//! The engine never talks to the network or the filesystem directly; each
//! outside dependency is one of these traits, passed into
//! [`NearbySearch`](crate::NearbySearch) as an `Arc<dyn Trait>`.

use async_trait::async_trait;
use nearstore_core::{Coordinate, DeliveryQuote, Store};
use thiserror::Error;

/// Street-level address returned for a postal code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostalAddress {
    pub street: String,
    pub locality: String,
    pub region: String,
}

impl PostalAddress {
    /// All three parts are present (non-blank).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.street, &self.locality, &self.region]
            .iter()
            .all(|part| !part.trim().is_empty())
    }

    /// `"<street>, <locality>, <region>"`, the form handed to the geocoder.
    #[must_use]
    pub fn free_text(&self) -> String {
        format!(
            "{}, {}, {}",
            self.street.trim(),
            self.locality.trim(),
            self.region.trim()
        )
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressLookupError {
    #[error("postal code not found: {0}")]
    NotFound(String),

    #[error("address lookup failed: {0}")]
    Lookup(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordinateLookupError {
    #[error("no coordinate match for address: {0}")]
    NoMatch(String),

    #[error("coordinate lookup failed: {0}")]
    Lookup(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShippingQuoteError {
    #[error("shipping provider error: {0}")]
    Provider(String),
}

#[async_trait]
pub trait StoreCatalogReader: Send + Sync {
    /// Returns every store in the catalog, in catalog order.
    async fn list_all(&self) -> Result<Vec<Store>, CatalogError>;
}

#[async_trait]
pub trait AddressLookup: Send + Sync {
    /// `postal_code` is already normalized to digits only.
    async fn lookup(&self, postal_code: &str) -> Result<PostalAddress, AddressLookupError>;
}

#[async_trait]
pub trait CoordinateLookup: Send + Sync {
    async fn lookup(&self, address: &str) -> Result<Coordinate, CoordinateLookupError>;
}

#[async_trait]
pub trait ShippingQuoteProvider: Send + Sync {
    /// Quotes shipping between two postal codes. An empty list is a valid answer.
    async fn quote(
        &self,
        origin_postal_code: &str,
        destination_postal_code: &str,
    ) -> Result<Vec<DeliveryQuote>, ShippingQuoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(street: &str, locality: &str, region: &str) -> PostalAddress {
        PostalAddress {
            street: street.to_string(),
            locality: locality.to_string(),
            region: region.to_string(),
        }
    }

    #[test]
    fn free_text_joins_parts() {
        let addr = address("Rua da Aurora", "Recife", "PE");
        assert_eq!(addr.free_text(), "Rua da Aurora, Recife, PE");
    }

    #[test]
    fn blank_street_is_incomplete() {
        assert!(!address("  ", "Recife", "PE").is_complete());
        assert!(!address("Rua", "", "PE").is_complete());
        assert!(address("Rua", "Recife", "PE").is_complete());
    }
}
