use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::stores::{Store, StoreType};
use crate::ConfigError;

/// One store entry as written in `stores.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub postal_code: String,
    pub city: String,
    pub state: Option<String>,
    #[serde(rename = "type")]
    pub store_type: StoreType,
}

impl StoreRecord {
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

impl From<StoreRecord> for Store {
    fn from(record: StoreRecord) -> Self {
        let coordinate = record.coordinate();
        Store {
            id: record.id,
            name: record.name,
            coordinate,
            postal_code: record.postal_code,
            city: record.city,
            state: record.state,
            store_type: record.store_type,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub stores: Vec<StoreRecord>,
}

impl CatalogFile {
    /// Converts the file records into catalog snapshots, preserving file order.
    #[must_use]
    pub fn into_stores(self) -> Vec<Store> {
        self.stores.into_iter().map(Store::from).collect()
    }
}

/// Load and validate the store catalog from a YAML file.
///
/// Unrecognized store types are accepted here; filtering them is the search
/// pipeline's job.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: CatalogFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CatalogFileParse)?;

    validate_catalog(&catalog)?;

    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for store in &catalog.stores {
        if store.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has an empty id",
                store.name
            )));
        }

        if store.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has an empty name",
                store.id
            )));
        }

        if !store.coordinate().is_valid() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has out-of-range coordinates ({}, {})",
                store.id, store.latitude, store.longitude
            )));
        }

        if !seen_ids.insert(store.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store id: '{}'",
                store.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
