//! Store catalog readers.

use std::path::PathBuf;

use async_trait::async_trait;
use nearstore_core::{load_catalog, Store};

use crate::ports::{CatalogError, StoreCatalogReader};

/// Reads the YAML catalog file on every call, so edits are picked up by the
/// next search without a restart.
#[derive(Debug, Clone)]
pub struct FileStoreCatalog {
    path: PathBuf,
}

impl FileStoreCatalog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StoreCatalogReader for FileStoreCatalog {
    async fn list_all(&self) -> Result<Vec<Store>, CatalogError> {
        let path = self.path.clone();
        let loaded = tokio::task::spawn_blocking(move || load_catalog(&path))
            .await
            .map_err(|e| CatalogError::Unavailable(format!("catalog read task failed: {e}")))?;

        match loaded {
            Ok(catalog) => Ok(catalog.into_stores()),
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to load store catalog"
                );
                Err(CatalogError::Unavailable(e.to_string()))
            }
        }
    }
}

/// Fixed in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    stores: Vec<Store>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new(stores: Vec<Store>) -> Self {
        Self { stores }
    }
}

#[async_trait]
impl StoreCatalogReader for InMemoryCatalog {
    async fn list_all(&self) -> Result<Vec<Store>, CatalogError> {
        Ok(self.stores.clone())
    }
}
