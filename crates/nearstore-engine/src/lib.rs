//! Nearby-store resolution and delivery-quote engine.
//!
//! Turns a customer postal code and the full store catalog into a ranked,
//! quoted, paginated [`SearchResult`]. All I/O goes through the collaborator
//! ports in [`ports`], injected at construction time.

pub mod assemble;
pub mod catalog;
pub mod delivery;
pub mod distance;
pub mod error;
pub mod ports;
pub mod resolver;
pub mod search;

pub use catalog::{FileStoreCatalog, InMemoryCatalog};
pub use delivery::{classify, decide, Decision, DeliveryRules, SHIPPING_ERROR_MARKER};
pub use distance::{distance_km, EARTH_RADIUS_KM};
pub use error::SearchError;
pub use ports::{
    AddressLookup, AddressLookupError, CatalogError, CoordinateLookup, CoordinateLookupError,
    PostalAddress, ShippingQuoteError, ShippingQuoteProvider, StoreCatalogReader,
};
pub use resolver::{normalize_postal_code, CoordinateResolver};
pub use search::{NearbySearch, Page, SearchOptions};

pub use nearstore_core::SearchResult;
