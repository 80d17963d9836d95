//! Subcommand handlers. Each prints pretty JSON to stdout.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use nearstore_core::{load_catalog, AppConfig, Store, StoreType};
use nearstore_engine::{FileStoreCatalog, Page};
use nearstore_lookup::{CorreiosClient, LookupClients};
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) async fn run_search(
    config: &AppConfig,
    cep: &str,
    limit: usize,
    offset: usize,
) -> anyhow::Result<()> {
    let clients = LookupClients::from_app_config(config)?;
    let catalog = Arc::new(FileStoreCatalog::new(config.catalog_path.clone()));
    let search = clients.nearby_search(config, catalog);

    let result = search
        .search(cep, Page { limit, offset })
        .await
        .with_context(|| format!("nearby search for {cep} failed"))?;
    print_json(&result)
}

pub(crate) async fn run_resolve(config: &AppConfig, cep: &str) -> anyhow::Result<()> {
    let clients = LookupClients::from_app_config(config)?;
    let coordinate = clients
        .resolver()
        .resolve(cep)
        .await
        .with_context(|| format!("could not resolve {cep}"))?;
    print_json(&coordinate)
}

pub(crate) async fn run_quote(config: &AppConfig, from: &str, to: &str) -> anyhow::Result<()> {
    let client = CorreiosClient::from_app_config(config)?;
    let quotes = client
        .calculate(from, to)
        .await
        .with_context(|| format!("carrier quote {from} -> {to} failed"))?;
    print_json(&quotes)
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct CatalogSummary {
    stores: usize,
    pdv: usize,
    loja: usize,
    /// Ids of stores that searches will skip.
    unrecognized: Vec<String>,
}

fn summarize(stores: &[Store]) -> CatalogSummary {
    let mut summary = CatalogSummary {
        stores: stores.len(),
        pdv: 0,
        loja: 0,
        unrecognized: Vec::new(),
    };
    for store in stores {
        match &store.store_type {
            StoreType::Pdv => summary.pdv += 1,
            StoreType::Loja => summary.loja += 1,
            StoreType::Unrecognized(raw) => {
                tracing::warn!(store_id = %store.id, store_type = %raw, "unrecognized store type");
                summary.unrecognized.push(store.id.clone());
            }
        }
    }
    summary
}

pub(crate) fn run_check_catalog(path: &Path) -> anyhow::Result<()> {
    let catalog = load_catalog(path)
        .with_context(|| format!("invalid store catalog at {}", path.display()))?;
    print_json(&summarize(&catalog.into_stores()))
}

#[cfg(test)]
mod tests {
    use nearstore_core::Coordinate;

    use super::*;

    fn store(id: &str, store_type: StoreType) -> Store {
        Store {
            id: id.to_owned(),
            name: id.to_owned(),
            coordinate: Coordinate::new(-8.0, -34.9),
            postal_code: "50000000".to_owned(),
            city: "Recife".to_owned(),
            state: None,
            store_type,
        }
    }

    #[test]
    fn summary_counts_types_and_lists_unrecognized() {
        let summary = summarize(&[
            store("a", StoreType::Pdv),
            store("b", StoreType::Loja),
            store("c", StoreType::Pdv),
            store("d", StoreType::Unrecognized("Quiosque".to_owned())),
        ]);
        assert_eq!(
            summary,
            CatalogSummary {
                stores: 4,
                pdv: 2,
                loja: 1,
                unrecognized: vec!["d".to_owned()],
            }
        );
    }

    #[test]
    fn repo_catalog_passes_check() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/stores.yaml");
        run_check_catalog(&path).expect("bundled catalog is valid");
    }
}
