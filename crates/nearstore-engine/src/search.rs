//! Nearby-store orchestration.
//!
//! Two stages: resolve the customer coordinate once, then evaluate the
//! catalog. Distances and rule decisions are computed for every store up
//! front; only carrier stores fan out to the shipping provider, with bounded
//! concurrency. Ordering is restored afterwards by a stable sort on distance,
//! and pagination is applied last.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use nearstore_core::{AppConfig, Coordinate, DeliveryChannel, DeliveryQuote, SearchResult, Store};

use crate::assemble::{assemble, IncludedStore};
use crate::delivery::{classify, Decision, DeliveryRules, SHIPPING_ERROR_MARKER};
use crate::distance::distance_km;
use crate::error::SearchError;
use crate::ports::StoreCatalogReader;
use crate::resolver::{normalize_postal_code, CoordinateResolver};

/// Offset/limit window over the sorted candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Upper bound on carrier quotes in flight. Values below 1 are treated as 1.
    pub max_concurrent_stores: usize,
    /// Deadline for the carrier-quoting stage. Carrier stores still pending
    /// when it elapses keep the shipping error marker as their only quote.
    pub stage_timeout: Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_concurrent_stores: 8,
            stage_timeout: Duration::from_secs(20),
        }
    }
}

impl SearchOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_concurrent_stores: config.search_max_concurrent_stores.max(1),
            stage_timeout: Duration::from_secs(config.search_timeout_secs),
        }
    }
}

/// Finds stores near a postal code and quotes delivery for each.
#[derive(Clone)]
pub struct NearbySearch {
    catalog: Arc<dyn StoreCatalogReader>,
    resolver: CoordinateResolver,
    rules: DeliveryRules,
    options: SearchOptions,
}

impl NearbySearch {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn StoreCatalogReader>,
        resolver: CoordinateResolver,
        rules: DeliveryRules,
        options: SearchOptions,
    ) -> Self {
        Self {
            catalog,
            resolver,
            rules,
            options,
        }
    }

    /// Runs a full search.
    ///
    /// The catalog is only read after the customer coordinate resolves.
    /// `total_stores` in the result is the catalog size, independent of how
    /// many stores the rules kept.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidPostalCode`] / [`SearchError::GeocodingFailed`]
    ///   if the customer coordinate cannot be resolved.
    /// - [`SearchError::CatalogUnavailable`] if the catalog read fails.
    pub async fn search(&self, postal_code: &str, page: Page) -> Result<SearchResult, SearchError> {
        let customer = self.resolver.resolve(postal_code).await?;
        let customer_postal_code = normalize_postal_code(postal_code);

        let stores = self
            .catalog
            .list_all()
            .await
            .map_err(|e| SearchError::CatalogUnavailable(e.to_string()))?;
        let total_stores = stores.len();

        let included = self
            .evaluate_all(stores, customer, &customer_postal_code)
            .await;
        let included_count = included.len();
        let ranked = rank_by_distance(included);
        let window = paginate(ranked, page);

        tracing::info!(
            postal_code = %customer_postal_code,
            total_stores,
            included = included_count,
            returned = window.len(),
            limit = page.limit,
            offset = page.offset,
            "nearby-store search completed"
        );

        Ok(assemble(customer, total_stores, window))
    }

    async fn evaluate_all(
        &self,
        stores: Vec<Store>,
        customer: Coordinate,
        customer_postal_code: &str,
    ) -> Vec<IncludedStore> {
        let mut candidates = Vec::with_capacity(stores.len());
        let mut quotes: Vec<Option<Vec<DeliveryQuote>>> = Vec::with_capacity(stores.len());
        let mut carrier_stores = Vec::new();

        for (catalog_index, store) in stores.into_iter().enumerate() {
            let distance = distance_km(&customer, &store.coordinate);
            let (channel, courier_quote) = match classify(&store, distance) {
                Decision::Courier(band) => {
                    (DeliveryChannel::LocalCourier, Some(vec![self.rules.courier_quote(band)]))
                }
                Decision::Carrier => {
                    carrier_stores.push((candidates.len(), store.clone()));
                    (DeliveryChannel::Carrier, None)
                }
                Decision::Excluded(reason) => {
                    tracing::debug!(
                        store_id = %store.id,
                        distance_km = distance,
                        ?reason,
                        "store excluded"
                    );
                    continue;
                }
            };
            quotes.push(courier_quote);
            candidates.push((catalog_index, store, distance, channel));
        }

        for (slot, carrier) in self.quote_carriers(carrier_stores, customer_postal_code).await {
            if let Some(entry) = quotes.get_mut(slot) {
                *entry = Some(carrier);
            }
        }

        candidates
            .into_iter()
            .zip(quotes)
            .map(|((catalog_index, store, distance, channel), quotes)| {
                let quotes = quotes.unwrap_or_else(|| {
                    tracing::warn!(
                        store_id = %store.id,
                        store = %store.name,
                        timeout_ms = self.options.stage_timeout.as_millis(),
                        "search deadline elapsed before carrier quote; using error marker"
                    );
                    vec![DeliveryQuote::failed(SHIPPING_ERROR_MARKER)]
                });
                IncludedStore {
                    catalog_index,
                    store,
                    distance_km: distance,
                    channel,
                    quotes,
                }
            })
            .collect()
    }

    /// Quotes carrier stores concurrently until the stage deadline. Returns
    /// `(slot, quotes)` for every store that finished in time.
    async fn quote_carriers(
        &self,
        carrier_stores: Vec<(usize, Store)>,
        customer_postal_code: &str,
    ) -> Vec<(usize, Vec<DeliveryQuote>)> {
        if carrier_stores.is_empty() {
            return Vec::new();
        }
        let deadline = tokio::time::sleep(self.options.stage_timeout);

        stream::iter(carrier_stores)
            .map(|(slot, store)| async move {
                (slot, self.rules.carrier_quotes(&store, customer_postal_code).await)
            })
            .buffer_unordered(self.options.max_concurrent_stores.max(1))
            .take_until(deadline)
            .collect()
            .await
    }
}

/// Restores catalog order, then stable-sorts ascending by distance so ties
/// keep their catalog order regardless of evaluation order.
fn rank_by_distance(mut included: Vec<IncludedStore>) -> Vec<IncludedStore> {
    included.sort_unstable_by_key(|s| s.catalog_index);
    included.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    included
}

fn paginate(ranked: Vec<IncludedStore>, page: Page) -> Vec<IncludedStore> {
    ranked
        .into_iter()
        .skip(page.offset)
        .take(page.limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use nearstore_core::{DeliveryChannel, StoreType};

    use super::*;

    fn included(index: usize, distance_km: f64) -> IncludedStore {
        IncludedStore {
            catalog_index: index,
            store: Store {
                id: format!("s{index}"),
                name: format!("Store {index}"),
                coordinate: Coordinate::new(0.0, 0.0),
                postal_code: "00000000".to_string(),
                city: "Recife".to_string(),
                state: None,
                store_type: StoreType::Pdv,
            },
            distance_km,
            channel: DeliveryChannel::LocalCourier,
            quotes: vec![],
        }
    }

    #[test]
    fn rank_sorts_by_distance_and_keeps_catalog_order_on_ties() {
        // Arrival order is scrambled as if evaluated concurrently.
        let ranked = rank_by_distance(vec![
            included(3, 5.0),
            included(0, 7.0),
            included(2, 5.0),
            included(1, 1.0),
        ]);
        let order: Vec<usize> = ranked.iter().map(|s| s.catalog_index).collect();
        assert_eq!(order, vec![1, 2, 3, 0]);
    }

    #[test]
    fn paginate_selects_window() {
        let ranked: Vec<IncludedStore> = (0..25u8)
            .map(|i| included(usize::from(i), f64::from(i)))
            .collect();
        let window = paginate(ranked, Page { limit: 10, offset: 20 });
        let order: Vec<usize> = window.iter().map(|s| s.catalog_index).collect();
        assert_eq!(order, vec![20, 21, 22, 23, 24]);
    }

    #[test]
    fn paginate_past_end_is_empty() {
        let ranked: Vec<IncludedStore> = (0..3).map(|i| included(i, 1.0)).collect();
        assert!(paginate(ranked, Page { limit: 5, offset: 3 }).is_empty());
    }

    #[test]
    fn default_page_is_first_ten() {
        assert_eq!(Page::default(), Page { limit: 10, offset: 0 });
    }
}
