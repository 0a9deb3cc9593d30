//! Common test infrastructure
//!
//! Fixture builders shared by the integration tests. Tests should only
//! import from this module.

#![allow(dead_code)]

use phone_catalog::catalog_store::{Brand, PhoneModel};
use phone_catalog::{CatalogStore, Fixtures};

pub const SAMSUNG_ID: i64 = 1;
pub const APPLE_ID: i64 = 2;
pub const EMPTY_BRAND_ID: i64 = 5;

pub const BUILTIN_BRAND_COUNT: usize = 6;
pub const BUILTIN_MODEL_COUNT: usize = 16;

pub fn brand(id: i64, name: &str) -> Brand {
    Brand {
        id,
        name: name.to_string(),
        logo: None,
        country: None,
        description: None,
        phone_count: 0,
        extra: Default::default(),
    }
}

pub fn model(id: i64, brand_id: i64, brand_name: &str, name: &str) -> PhoneModel {
    PhoneModel {
        id,
        brand_id,
        brand_name: brand_name.to_string(),
        name: name.to_string(),
        description: String::new(),
        price: None,
        release_date: None,
        image: None,
        specs: None,
        extra: Default::default(),
    }
}

pub fn priced(mut model: PhoneModel, price: f64, release_date: &str) -> PhoneModel {
    model.price = Some(price);
    model.release_date = Some(release_date.to_string());
    model
}

/// Five brands (ids 1 to 5) and four models. Brand 5 has no models.
pub fn small_fixtures() -> Fixtures {
    let mut galaxy = priced(
        model(1, SAMSUNG_ID, "Samsung", "Galaxy S21"),
        799.0,
        "2021-01-29",
    );
    galaxy.description = "Samsung flagship with a 120Hz display".to_string();

    Fixtures::new(
        vec![
            brand(SAMSUNG_ID, "Samsung"),
            brand(APPLE_ID, "Apple"),
            brand(3, "Google"),
            brand(4, "Xiaomi"),
            brand(EMPTY_BRAND_ID, "Nokia"),
        ],
        vec![
            galaxy,
            priced(model(2, SAMSUNG_ID, "Samsung", "Galaxy A52"), 349.0, "2021-03-17"),
            priced(model(3, APPLE_ID, "Apple", "iPhone 13"), 799.0, "2021-09-24"),
            priced(model(4, 3, "Google", "Pixel 6"), 599.0, "2021-10-28"),
        ],
    )
}

pub fn small_store() -> CatalogStore {
    CatalogStore::new(small_fixtures())
}

pub fn builtin_store() -> CatalogStore {
    CatalogStore::new(Fixtures::builtin().unwrap())
}

/// Asserts every brand's `phone_count` matches the models that point at it.
pub fn assert_phone_counts_consistent(store: &CatalogStore) {
    let models = store.current_models();
    for brand in store.current_brands() {
        let expected = models.iter().filter(|m| m.brand_id == brand.id).count();
        assert_eq!(
            brand.phone_count, expected,
            "phoneCount of brand {} ({}) is stale",
            brand.id, brand.name
        );
    }
}
