use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Store category as recorded in the catalog.
///
/// Unknown strings are preserved in [`StoreType::Unrecognized`] instead of
/// failing deserialization, so a single bad record does not take down the
/// whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StoreType {
    /// Small pickup point, local-courier delivery only.
    Pdv,
    /// Full store, local courier or long-haul carrier.
    Loja,
    Unrecognized(String),
}

impl From<String> for StoreType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PDV" => StoreType::Pdv,
            "Loja" => StoreType::Loja,
            _ => StoreType::Unrecognized(raw),
        }
    }
}

impl From<StoreType> for String {
    fn from(store_type: StoreType) -> Self {
        store_type.to_string()
    }
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::Pdv => write!(f, "PDV"),
            StoreType::Loja => write!(f, "Loja"),
            StoreType::Unrecognized(raw) => write!(f, "{raw}"),
        }
    }
}

/// Read-only catalog snapshot of a single store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub postal_code: String,
    pub city: String,
    pub state: Option<String>,
    pub store_type: StoreType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_type_parses_known_values() {
        assert_eq!(StoreType::from("PDV".to_string()), StoreType::Pdv);
        assert_eq!(StoreType::from("Loja".to_string()), StoreType::Loja);
    }

    #[test]
    fn store_type_is_case_sensitive() {
        assert_eq!(
            StoreType::from("pdv".to_string()),
            StoreType::Unrecognized("pdv".to_string())
        );
    }

    #[test]
    fn store_type_serializes_as_plain_string() {
        let json = serde_json::to_string(&StoreType::Loja).expect("serialize");
        assert_eq!(json, "\"Loja\"");
        let back: StoreType = serde_json::from_str("\"Quiosque\"").expect("deserialize");
        assert_eq!(back, StoreType::Unrecognized("Quiosque".to_string()));
    }
}
