use std::path::Path;

use super::*;

fn record(id: &str, name: &str, store_type: &str) -> StoreRecord {
    StoreRecord {
        id: id.to_string(),
        name: name.to_string(),
        latitude: -8.05,
        longitude: -34.9,
        postal_code: "50030-230".to_string(),
        city: "Recife".to_string(),
        state: Some("PE".to_string()),
        store_type: StoreType::from(store_type.to_string()),
    }
}

#[test]
fn validate_accepts_valid_catalog() {
    let catalog = CatalogFile {
        stores: vec![record("s1", "Loja Boa Vista", "Loja"), record("s2", "PDV Derby", "PDV")],
    };
    assert!(validate_catalog(&catalog).is_ok());
}

#[test]
fn validate_accepts_unrecognized_type() {
    let catalog = CatalogFile {
        stores: vec![record("s1", "Quiosque", "Quiosque")],
    };
    assert!(validate_catalog(&catalog).is_ok());
}

#[test]
fn validate_rejects_empty_id() {
    let catalog = CatalogFile {
        stores: vec![record("  ", "Loja", "Loja")],
    };
    let err = validate_catalog(&catalog).unwrap_err();
    assert!(err.to_string().contains("empty id"));
}

#[test]
fn validate_rejects_empty_name() {
    let catalog = CatalogFile {
        stores: vec![record("s1", "", "Loja")],
    };
    let err = validate_catalog(&catalog).unwrap_err();
    assert!(err.to_string().contains("empty name"));
}

#[test]
fn validate_rejects_duplicate_id() {
    let catalog = CatalogFile {
        stores: vec![record("s1", "A", "Loja"), record("s1", "B", "PDV")],
    };
    let err = validate_catalog(&catalog).unwrap_err();
    assert!(err.to_string().contains("duplicate store id"));
}

#[test]
fn validate_rejects_out_of_range_coordinates() {
    let mut bad = record("s1", "A", "Loja");
    bad.latitude = 123.0;
    let catalog = CatalogFile { stores: vec![bad] };
    let err = validate_catalog(&catalog).unwrap_err();
    assert!(err.to_string().contains("out-of-range"));
}

#[test]
fn parse_yaml_maps_type_field() {
    let yaml = r#"
stores:
  - id: s1
    name: Loja Centro
    latitude: -8.06
    longitude: -34.88
    postal_code: "50010-000"
    city: Recife
    state: PE
    type: Loja
  - id: s2
    name: Banca
    latitude: -8.07
    longitude: -34.89
    postal_code: "50020-000"
    city: Recife
    type: Banca
"#;
    let catalog: CatalogFile = serde_yaml::from_str(yaml).expect("parse");
    let stores = catalog.into_stores();
    assert_eq!(stores.len(), 2);
    assert_eq!(stores[0].store_type, StoreType::Loja);
    assert_eq!(stores[0].coordinate, Coordinate::new(-8.06, -34.88));
    assert_eq!(stores[1].state, None);
    assert_eq!(
        stores[1].store_type,
        StoreType::Unrecognized("Banca".to_string())
    );
}

#[test]
fn load_catalog_reports_missing_file() {
    let err = load_catalog(Path::new("/definitely/not/here/stores.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::CatalogFileIo { .. }));
}

#[test]
fn load_catalog_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("stores.yaml");
    assert!(
        path.exists(),
        "stores.yaml missing at {path:?}"
    );
    let result = load_catalog(&path);
    assert!(result.is_ok(), "failed to load stores.yaml: {result:?}");
    assert!(!result.unwrap().stores.is_empty());
}
