//! Projection from ranked stores to the public [`SearchResult`] shape.

use nearstore_core::{
    Coordinate, DeliveryChannel, DeliveryQuote, MapPin, NearbyStoreResult, SearchResult, Store,
};

/// A store that passed the delivery rules, with its position in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludedStore {
    pub catalog_index: usize,
    pub store: Store,
    pub distance_km: f64,
    pub channel: DeliveryChannel,
    pub quotes: Vec<DeliveryQuote>,
}

/// Builds the result lists from an already sorted and paginated slice.
#[must_use]
pub fn assemble(
    customer_coordinate: Coordinate,
    total_stores: usize,
    page: Vec<IncludedStore>,
) -> SearchResult {
    let (nearby_stores, pins): (Vec<_>, Vec<_>) = page.into_iter().map(project).unzip();

    SearchResult {
        customer_coordinate,
        total_stores,
        nearby_stores,
        pins,
    }
}

fn project(included: IncludedStore) -> (NearbyStoreResult, MapPin) {
    let IncludedStore {
        store,
        distance_km,
        channel,
        quotes,
        ..
    } = included;

    let pin = MapPin {
        position: store.coordinate,
        title: store.name.clone(),
    };
    let result = NearbyStoreResult {
        id: store.id,
        name: store.name,
        city: store.city,
        state: store.state,
        postal_code: store.postal_code,
        store_type: store.store_type,
        distance_km,
        distance_label: format!("{distance_km:.2} km"),
        channel,
        quotes,
    };
    (result, pin)
}

#[cfg(test)]
mod tests {
    use nearstore_core::StoreType;

    use super::*;

    fn included(name: &str, distance_km: f64) -> IncludedStore {
        IncludedStore {
            catalog_index: 0,
            store: Store {
                id: name.to_lowercase(),
                name: name.to_string(),
                coordinate: Coordinate::new(-8.0, -34.9),
                postal_code: "50000-000".to_string(),
                city: "Recife".to_string(),
                state: Some("PE".to_string()),
                store_type: StoreType::Pdv,
            },
            distance_km,
            channel: DeliveryChannel::LocalCourier,
            quotes: vec![DeliveryQuote::offer("1 dia útil", "R$ 15,00", "local courier")],
        }
    }

    #[test]
    fn pins_mirror_results() {
        let result = assemble(
            Coordinate::new(-8.0361, -34.8803),
            9,
            vec![included("Alpha", 1.0), included("Beta", 2.5)],
        );
        assert_eq!(result.total_stores, 9);
        assert_eq!(result.nearby_stores.len(), result.pins.len());
        assert_eq!(result.pins[1].title, "Beta");
        assert_eq!(result.pins[1].position, Coordinate::new(-8.0, -34.9));
        assert_eq!(result.nearby_stores[0].name, "Alpha");
    }

    #[test]
    fn distance_label_has_two_decimals() {
        let result = assemble(Coordinate::new(0.0, 0.0), 1, vec![included("Alpha", 8.034_9)]);
        assert_eq!(result.nearby_stores[0].distance_label, "8.03 km");
    }

    #[test]
    fn empty_page_yields_empty_lists() {
        let result = assemble(Coordinate::new(0.0, 0.0), 4, vec![]);
        assert!(result.nearby_stores.is_empty());
        assert!(result.pins.is_empty());
        assert_eq!(result.total_stores, 4);
    }
}
