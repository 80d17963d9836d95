//! Per-search output shapes. Nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::stores::StoreType;

/// A delivery offer, or the marker left behind when quoting failed for a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeliveryQuote {
    Offer {
        lead_time: String,
        price: String,
        description: String,
    },
    Failed {
        error: String,
    },
}

impl DeliveryQuote {
    #[must_use]
    pub fn offer(
        lead_time: impl Into<String>,
        price: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        DeliveryQuote::Offer {
            lead_time: lead_time.into(),
            price: price.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        DeliveryQuote::Failed {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryChannel {
    LocalCourier,
    Carrier,
}

impl std::fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryChannel::LocalCourier => write!(f, "local_courier"),
            DeliveryChannel::Carrier => write!(f, "carrier"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyStoreResult {
    pub id: String,
    pub name: String,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    #[serde(rename = "type")]
    pub store_type: StoreType,
    pub distance_km: f64,
    /// Display form of `distance_km`, e.g. `"8.03 km"`.
    pub distance_label: String,
    pub channel: DeliveryChannel,
    pub quotes: Vec<DeliveryQuote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPin {
    pub position: Coordinate,
    pub title: String,
}

/// Public result of a nearby-store search.
///
/// `nearby_stores` and `pins` always have equal length and share ordering.
/// `total_stores` counts the catalog entries considered, not the filtered ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub customer_coordinate: Coordinate,
    pub total_stores: usize,
    pub nearby_stores: Vec<NearbyStoreResult>,
    pub pins: Vec<MapPin>,
}
