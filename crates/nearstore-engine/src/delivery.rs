//! Delivery rules: picks a channel per store and produces its quotes.
//!
//! | store type   | distance | outcome                                  |
//! |--------------|----------|------------------------------------------|
//! | PDV          | ≤ 50 km  | local courier, distance-banded lead time |
//! | PDV          | > 50 km  | excluded                                 |
//! | Loja         | ≤ 50 km  | local courier, distance-banded lead time |
//! | Loja         | > 50 km  | carrier quote from the shipping provider |
//! | unrecognized | any      | excluded, with a warning                 |

use std::sync::Arc;
use std::time::Duration;

use nearstore_core::{CourierConfig, DeliveryQuote, Store, StoreType};

use crate::ports::{ShippingQuoteError, ShippingQuoteProvider};

/// Stores farther than this are never served by the local courier.
pub const COURIER_RADIUS_KM: f64 = 50.0;
const BAND_A_KM: f64 = 10.0;
const BAND_B_KM: f64 = 30.0;

/// Quote left in place of carrier offers when the provider fails for a store.
pub const SHIPPING_ERROR_MARKER: &str = "failed to calculate shipping";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourierBand {
    /// ≤ 10 km
    A,
    /// ≤ 30 km
    B,
    /// ≤ 50 km
    C,
}

impl CourierBand {
    /// Band for a courier-eligible distance; `None` beyond the courier radius.
    #[must_use]
    pub fn for_distance(distance_km: f64) -> Option<Self> {
        if distance_km <= BAND_A_KM {
            Some(CourierBand::A)
        } else if distance_km <= BAND_B_KM {
            Some(CourierBand::B)
        } else if distance_km <= COURIER_RADIUS_KM {
            Some(CourierBand::C)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    OutOfCourierRange,
    UnrecognizedType(String),
    NonFiniteDistance,
}

/// Pure decision from the rule table, before any quoting I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Courier(CourierBand),
    Carrier,
    Excluded(ExclusionReason),
}

/// Applies the rule table to a store type and distance.
#[must_use]
pub fn decide(store_type: &StoreType, distance_km: f64) -> Decision {
    if let StoreType::Unrecognized(raw) = store_type {
        return Decision::Excluded(ExclusionReason::UnrecognizedType(raw.clone()));
    }
    if !distance_km.is_finite() {
        return Decision::Excluded(ExclusionReason::NonFiniteDistance);
    }

    match (store_type, CourierBand::for_distance(distance_km)) {
        (_, Some(band)) => Decision::Courier(band),
        (StoreType::Loja, None) => Decision::Carrier,
        _ => Decision::Excluded(ExclusionReason::OutOfCourierRange),
    }
}

/// Applies [`decide`] to a catalog store, logging stores whose type the
/// rule table does not know.
#[must_use]
pub fn classify(store: &Store, distance_km: f64) -> Decision {
    let decision = decide(&store.store_type, distance_km);
    if let Decision::Excluded(ExclusionReason::UnrecognizedType(raw)) = &decision {
        tracing::warn!(
            store_id = %store.id,
            store = %store.name,
            store_type = %raw,
            "unrecognized store type; excluding store from results"
        );
    }
    decision
}

/// Merges a carrier quoting result into the store's quote list.
///
/// A provider failure becomes a single error-marker quote so the store stays
/// visible to the customer.
#[must_use]
pub fn quotes_or_marker(
    result: Result<Vec<DeliveryQuote>, ShippingQuoteError>,
) -> Vec<DeliveryQuote> {
    match result {
        Ok(quotes) => quotes,
        Err(_) => vec![DeliveryQuote::failed(SHIPPING_ERROR_MARKER)],
    }
}

#[derive(Clone)]
pub struct DeliveryRules {
    courier: CourierConfig,
    shipping: Arc<dyn ShippingQuoteProvider>,
    quote_timeout: Duration,
}

impl DeliveryRules {
    #[must_use]
    pub fn new(
        courier: CourierConfig,
        shipping: Arc<dyn ShippingQuoteProvider>,
        quote_timeout: Duration,
    ) -> Self {
        Self {
            courier,
            shipping,
            quote_timeout,
        }
    }

    /// The fixed local-courier quote for a band.
    #[must_use]
    pub fn courier_quote(&self, band: CourierBand) -> DeliveryQuote {
        let lead_time = match band {
            CourierBand::A => &self.courier.lead_time_10km,
            CourierBand::B => &self.courier.lead_time_30km,
            CourierBand::C => &self.courier.lead_time_50km,
        };
        DeliveryQuote::offer(
            lead_time.as_str(),
            self.courier.price.as_str(),
            self.courier.description.as_str(),
        )
    }

    /// Quotes for a store on the carrier path.
    ///
    /// Never fails: provider errors and timeouts are folded into an
    /// error-marker quote for this store only.
    pub async fn carrier_quotes(
        &self,
        store: &Store,
        customer_postal_code: &str,
    ) -> Vec<DeliveryQuote> {
        quotes_or_marker(self.request_quotes(store, customer_postal_code).await)
    }

    async fn request_quotes(
        &self,
        store: &Store,
        customer_postal_code: &str,
    ) -> Result<Vec<DeliveryQuote>, ShippingQuoteError> {
        let call = self.shipping.quote(customer_postal_code, &store.postal_code);
        match tokio::time::timeout(self.quote_timeout, call).await {
            Ok(Ok(quotes)) => Ok(quotes),
            Ok(Err(e)) => {
                tracing::warn!(
                    store_id = %store.id,
                    store = %store.name,
                    error = %e,
                    "shipping quote failed"
                );
                Err(e)
            }
            Err(_) => {
                tracing::warn!(
                    store_id = %store.id,
                    store = %store.name,
                    timeout_ms = self.quote_timeout.as_millis(),
                    "shipping quote timed out"
                );
                Err(ShippingQuoteError::Provider("timed out".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use nearstore_core::Coordinate;

    use super::*;

    struct ScriptedShipping {
        result: Result<Vec<DeliveryQuote>, ShippingQuoteError>,
        delay: Duration,
        calls: AtomicU32,
    }

    #[async_trait]
    impl ShippingQuoteProvider for ScriptedShipping {
        async fn quote(
            &self,
            _origin: &str,
            _destination: &str,
        ) -> Result<Vec<DeliveryQuote>, ShippingQuoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.result.clone()
        }
    }

    fn shipping(result: Result<Vec<DeliveryQuote>, ShippingQuoteError>) -> Arc<ScriptedShipping> {
        Arc::new(ScriptedShipping {
            result,
            delay: Duration::ZERO,
            calls: AtomicU32::new(0),
        })
    }

    fn rules(shipping: Arc<ScriptedShipping>) -> DeliveryRules {
        DeliveryRules::new(CourierConfig::default(), shipping, Duration::from_secs(5))
    }

    fn store(store_type: StoreType) -> Store {
        Store {
            id: "s1".to_string(),
            name: "Loja Teste".to_string(),
            coordinate: Coordinate::new(-8.05, -34.9),
            postal_code: "52031-900".to_string(),
            city: "Recife".to_string(),
            state: Some("PE".to_string()),
            store_type,
        }
    }

    #[test]
    fn band_boundaries_are_inclusive() {
        assert_eq!(CourierBand::for_distance(0.0), Some(CourierBand::A));
        assert_eq!(CourierBand::for_distance(10.0), Some(CourierBand::A));
        assert_eq!(CourierBand::for_distance(10.01), Some(CourierBand::B));
        assert_eq!(CourierBand::for_distance(30.0), Some(CourierBand::B));
        assert_eq!(CourierBand::for_distance(50.0), Some(CourierBand::C));
        assert_eq!(CourierBand::for_distance(50.01), None);
    }

    #[test]
    fn decision_table() {
        assert_eq!(decide(&StoreType::Pdv, 8.0), Decision::Courier(CourierBand::A));
        assert_eq!(
            decide(&StoreType::Pdv, 51.0),
            Decision::Excluded(ExclusionReason::OutOfCourierRange)
        );
        assert_eq!(decide(&StoreType::Loja, 49.0), Decision::Courier(CourierBand::C));
        assert_eq!(decide(&StoreType::Loja, 120.0), Decision::Carrier);
        assert_eq!(
            decide(&StoreType::Unrecognized("Banca".to_string()), 1.0),
            Decision::Excluded(ExclusionReason::UnrecognizedType("Banca".to_string()))
        );
        assert_eq!(
            decide(&StoreType::Loja, f64::NAN),
            Decision::Excluded(ExclusionReason::NonFiniteDistance)
        );
    }

    #[test]
    fn courier_quote_uses_band_lead_time() {
        let rules = rules(shipping(Ok(vec![])));
        assert_eq!(
            rules.courier_quote(CourierBand::B),
            DeliveryQuote::offer("2 dias úteis", "R$ 15,00", "local courier")
        );
        assert_eq!(
            rules.courier_quote(CourierBand::C),
            DeliveryQuote::offer("3 dias úteis", "R$ 15,00", "local courier")
        );
    }

    #[test]
    fn loja_within_radius_is_courier() {
        assert_eq!(
            classify(&store(StoreType::Loja), 45.0),
            Decision::Courier(CourierBand::C)
        );
    }

    #[tokio::test]
    async fn carrier_returns_provider_quotes_in_order() {
        let quotes = vec![
            DeliveryQuote::offer("5", "R$ 30.00", "SEDEX"),
            DeliveryQuote::offer("9", "R$ 18.00", "PAC"),
        ];
        let provider = shipping(Ok(quotes.clone()));
        let got = rules(provider.clone())
            .carrier_quotes(&store(StoreType::Loja), "50000000")
            .await;
        assert_eq!(got, quotes);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn carrier_failure_becomes_error_marker() {
        let provider = shipping(Err(ShippingQuoteError::Provider("503".to_string())));
        let got = rules(provider)
            .carrier_quotes(&store(StoreType::Loja), "50000000")
            .await;
        assert_eq!(got, vec![DeliveryQuote::failed(SHIPPING_ERROR_MARKER)]);
    }

    #[tokio::test(start_paused = true)]
    async fn carrier_timeout_becomes_error_marker() {
        let provider = Arc::new(ScriptedShipping {
            result: Ok(vec![DeliveryQuote::offer("1", "R$ 1.00", "late")]),
            delay: Duration::from_secs(60),
            calls: AtomicU32::new(0),
        });
        let rules = DeliveryRules::new(CourierConfig::default(), provider, Duration::from_secs(1));
        let got = rules
            .carrier_quotes(&store(StoreType::Loja), "50000000")
            .await;
        assert_eq!(got, vec![DeliveryQuote::failed(SHIPPING_ERROR_MARKER)]);
    }

    #[test]
    fn unrecognized_type_is_excluded_with_warning() {
        use std::sync::Mutex;
        use tracing_subscriber::layer::SubscriberExt;

        #[derive(Clone, Default)]
        struct WarningCapture {
            warnings: Arc<Mutex<Vec<String>>>,
        }

        impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarningCapture {
            fn on_event(
                &self,
                event: &tracing::Event<'_>,
                _ctx: tracing_subscriber::layer::Context<'_, S>,
            ) {
                if *event.metadata().level() == tracing::Level::WARN {
                    let mut visitor = FieldVisitor(String::new());
                    event.record(&mut visitor);
                    self.warnings.lock().unwrap().push(visitor.0);
                }
            }
        }

        struct FieldVisitor(String);

        impl tracing::field::Visit for FieldVisitor {
            fn record_debug(
                &mut self,
                field: &tracing::field::Field,
                value: &dyn std::fmt::Debug,
            ) {
                self.0.push_str(&format!("{}={value:?} ", field.name()));
            }
        }

        let capture = WarningCapture::default();
        let warnings = capture.warnings.clone();
        let subscriber = tracing_subscriber::registry().with(capture);

        let decision = tracing::subscriber::with_default(subscriber, || {
            classify(&store(StoreType::Unrecognized("Banca".to_string())), 2.0)
        });

        assert_eq!(
            decision,
            Decision::Excluded(ExclusionReason::UnrecognizedType("Banca".to_string()))
        );
        let captured = warnings.lock().unwrap();
        assert_eq!(captured.len(), 1, "expected one warning, got {:?}", *captured);
        assert!(captured[0].contains("unrecognized store type"), "{:?}", captured[0]);
        assert!(captured[0].contains("Banca"), "{:?}", captured[0]);
    }

    #[test]
    fn known_types_do_not_warn() {
        use std::sync::atomic::AtomicUsize;
        use tracing_subscriber::layer::SubscriberExt;

        struct WarnCounter(Arc<AtomicUsize>);

        impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCounter {
            fn on_event(
                &self,
                event: &tracing::Event<'_>,
                _ctx: tracing_subscriber::layer::Context<'_, S>,
            ) {
                if *event.metadata().level() == tracing::Level::WARN {
                    self.0.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(count.clone()));
        tracing::subscriber::with_default(subscriber, || {
            classify(&store(StoreType::Pdv), 80.0);
            classify(&store(StoreType::Loja), 3.0);
        });
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn quotes_or_marker_passes_through_empty_list() {
        assert!(quotes_or_marker(Ok(vec![])).is_empty());
    }
}
