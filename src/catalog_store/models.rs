//! Catalog data models.
//!
//! Records are flat JSON objects, the same shape the fixture files use.
//! Inputs come in two flavours: `New*` for creation (no id, the store assigns
//! it) and `*Patch` for shallow updates, where an absent field keeps the
//! current value and a present one overwrites it.
//!
//! Keys the store does not know about are carried along untouched in `extra`
//! and written back at the top level of the record.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Descriptive fields outside the known schema.
pub type Extra = serde_json::Map<String, serde_json::Value>;

const BRAND_KEYS: &[&str] = &["id", "name", "logo", "country", "description", "phoneCount"];
const MODEL_KEYS: &[&str] = &[
    "id",
    "brand_id",
    "brand_name",
    "name",
    "description",
    "price",
    "release_date",
    "image",
    "specs",
];

/// Overlays `extra` onto `target` key by key. Keys in `owned` belong to the
/// record itself and are dropped.
fn merge_extra(target: &mut Extra, extra: Extra, owned: &[&str]) {
    for (key, value) in extra {
        if !owned.contains(&key.as_str()) {
            target.insert(key, value);
        }
    }
}

// =============================================================================
// Brands
// =============================================================================

/// A phone manufacturer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Number of models referencing this brand. Maintained by the store.
    #[serde(rename = "phoneCount", default)]
    pub phone_count: usize,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Fields for a brand that does not exist yet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewBrand {
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl NewBrand {
    pub fn named(name: impl Into<String>) -> Self {
        NewBrand {
            name: name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn into_brand(self, id: i64) -> Brand {
        let mut extra = Extra::new();
        merge_extra(&mut extra, self.extra, BRAND_KEYS);
        Brand {
            id,
            name: self.name,
            logo: self.logo,
            country: self.country,
            description: self.description,
            phone_count: 0,
            extra,
        }
    }
}

/// Partial brand update. `Some(None)` on a nullable field clears it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct BrandPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub logo: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub country: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    /// Unknown keys, each overwriting the brand's own.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Brand {
    /// Overlays the fields present in `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: BrandPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(logo) = patch.logo {
            self.logo = logo;
        }
        if let Some(country) = patch.country {
            self.country = country;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        merge_extra(&mut self.extra, patch.extra, BRAND_KEYS);
    }
}

// =============================================================================
// Phone models
// =============================================================================

/// A phone model belonging (loosely) to a brand.
///
/// `brand_id` is not enforced: a model may point at a brand that does not
/// exist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhoneModel {
    pub id: i64,
    pub brand_id: i64,
    #[serde(default)]
    pub brand_name: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Opaque nested specs object, replaced as a whole on update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specs: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl PhoneModel {
    /// Parsed `release_date`, if it is a date or an RFC 3339 timestamp.
    pub fn released_at(&self) -> Option<NaiveDateTime> {
        self.release_date.as_deref().and_then(parse_release_date)
    }

    /// Case-insensitive substring match on name, brand name and description.
    /// `needle` must already be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.brand_name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    /// Overlays the fields present in `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: PhoneModelPatch) {
        if let Some(brand_id) = patch.brand_id {
            self.brand_id = brand_id;
        }
        if let Some(brand_name) = patch.brand_name {
            self.brand_name = brand_name;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(release_date) = patch.release_date {
            self.release_date = release_date;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(specs) = patch.specs {
            self.specs = specs;
        }
        merge_extra(&mut self.extra, patch.extra, MODEL_KEYS);
    }
}

/// Fields for a phone model that does not exist yet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPhoneModel {
    pub brand_id: i64,
    #[serde(default)]
    pub brand_name: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub specs: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl NewPhoneModel {
    pub fn new(brand_id: i64, name: impl Into<String>) -> Self {
        NewPhoneModel {
            brand_id,
            name: name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn into_model(self, id: i64) -> PhoneModel {
        let mut extra = Extra::new();
        merge_extra(&mut extra, self.extra, MODEL_KEYS);
        PhoneModel {
            id,
            brand_id: self.brand_id,
            brand_name: self.brand_name,
            name: self.name,
            description: self.description,
            price: self.price,
            release_date: self.release_date,
            image: self.image,
            specs: self.specs,
            extra,
        }
    }
}

/// Partial phone model update. `Some(None)` on a nullable field clears it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PhoneModelPatch {
    #[serde(default)]
    pub brand_id: Option<i64>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_price_patch")]
    pub price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub release_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub specs: Option<Option<serde_json::Value>>,
    /// Unknown keys, each overwriting the model's own.
    #[serde(flatten)]
    pub extra: Extra,
}

// =============================================================================
// Listing and statistics
// =============================================================================

/// 1-indexed page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest { page: 1, limit: 10 }
    }
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        PageRequest { page, limit }
    }

    /// Index of the first item on this page. None for page 0, which holds
    /// nothing.
    pub(crate) fn offset(&self) -> Option<usize> {
        self.page.checked_sub(1)?.checked_mul(self.limit)
    }
}

/// Pagination block attached to paged listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl Pagination {
    pub fn new(request: PageRequest, total: usize) -> Self {
        let total_pages = if request.limit == 0 {
            0
        } else {
            total.div_ceil(request.limit)
        };
        Pagination {
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
        }
    }
}

/// Catalog-wide statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_brands: usize,
    pub total_models: usize,
    pub average_price: f64,
    pub latest_model: Option<PhoneModel>,
}

// =============================================================================
// Serde helpers
// =============================================================================

/// Maps a present field (even `null`) to `Some`, so patches can tell an
/// explicit `null` from an absent key.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(price_from_json))
}

fn lenient_price_patch<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_price(deserializer).map(Some)
}

/// Numbers and numeric strings become a price, anything else is no price.
pub fn price_from_json(value: &serde_json::Value) -> Option<f64> {
    let price = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    price.is_finite().then_some(price)
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_release_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc())
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model_json() -> serde_json::Value {
        json!({
            "id": 7,
            "brand_id": 2,
            "brand_name": "Samsung",
            "name": "Galaxy S21",
            "description": "flagship",
            "price": 799.0,
            "release_date": "2021-01-29",
            "specs": { "ram": "8GB", "storage": "128GB" }
        })
    }

    #[test]
    fn test_price_accepts_numbers_and_numeric_strings() {
        assert_eq!(price_from_json(&json!(10)), Some(10.0));
        assert_eq!(price_from_json(&json!("199.5")), Some(199.5));
        assert_eq!(price_from_json(&json!(" 42 ")), Some(42.0));
        assert_eq!(price_from_json(&json!("cheap")), None);
        assert_eq!(price_from_json(&json!("NaN")), None);
        assert_eq!(price_from_json(&json!(null)), None);
        assert_eq!(price_from_json(&json!({ "amount": 3 })), None);
    }

    #[test]
    fn test_model_deserializes_with_lenient_price() {
        let mut raw = model_json();
        raw["price"] = json!("n/a");
        let model: PhoneModel = serde_json::from_value(raw).unwrap();
        assert_eq!(model.price, None);

        let mut raw = model_json();
        raw.as_object_mut().unwrap().remove("price");
        let model: PhoneModel = serde_json::from_value(raw).unwrap();
        assert_eq!(model.price, None);
    }

    #[test]
    fn test_brand_serializes_phone_count_in_camel_case() {
        let brand = Brand {
            id: 1,
            name: "Acme".to_string(),
            logo: None,
            country: None,
            description: None,
            phone_count: 3,
            extra: Extra::new(),
        };
        let value = serde_json::to_value(&brand).unwrap();
        assert_eq!(value["phoneCount"], json!(3));
        assert!(value.get("logo").is_none());
    }

    #[test]
    fn test_brand_patch_distinguishes_null_from_absent() {
        let patch: BrandPatch = serde_json::from_value(json!({ "logo": null })).unwrap();
        assert_eq!(patch.logo, Some(None));
        assert_eq!(patch.country, None);
        assert_eq!(patch.name, None);
    }

    #[test]
    fn test_brand_apply_overlays_only_present_fields() {
        let mut brand = Brand {
            id: 4,
            name: "Old".to_string(),
            logo: Some("old.png".to_string()),
            country: Some("FI".to_string()),
            description: None,
            phone_count: 2,
            extra: Extra::new(),
        };
        brand.apply(BrandPatch {
            name: Some("New".to_string()),
            logo: Some(None),
            ..Default::default()
        });
        assert_eq!(brand.id, 4);
        assert_eq!(brand.name, "New");
        assert_eq!(brand.logo, None);
        assert_eq!(brand.country.as_deref(), Some("FI"));
        assert_eq!(brand.phone_count, 2);
    }

    #[test]
    fn test_model_apply_replaces_specs_wholesale() {
        let mut model: PhoneModel = serde_json::from_value(model_json()).unwrap();
        let patch: PhoneModelPatch =
            serde_json::from_value(json!({ "specs": { "ram": "12GB" }, "price": "899" }))
                .unwrap();
        model.apply(patch);

        assert_eq!(model.specs, Some(json!({ "ram": "12GB" })));
        assert_eq!(model.price, Some(899.0));
        assert_eq!(model.name, "Galaxy S21");
        assert_eq!(model.brand_id, 2);
    }

    #[test]
    fn test_unknown_keys_round_trip_at_top_level() {
        let mut raw = model_json();
        raw["color"] = json!("red");
        raw["ports"] = json!({ "usb": "C" });
        let model: PhoneModel = serde_json::from_value(raw).unwrap();
        assert_eq!(model.extra["color"], json!("red"));
        assert!(!model.extra.contains_key("name"));

        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["color"], json!("red"));
        assert_eq!(value["ports"], json!({ "usb": "C" }));
        assert_eq!(value["name"], json!("Galaxy S21"));
    }

    #[test]
    fn test_patch_overlays_unknown_keys_one_by_one() {
        let mut raw = model_json();
        raw["color"] = json!("red");
        raw["weight"] = json!(169);
        let mut model: PhoneModel = serde_json::from_value(raw).unwrap();

        let patch: PhoneModelPatch = serde_json::from_value(json!({ "color": "blue" })).unwrap();
        model.apply(patch);

        assert_eq!(model.extra["color"], json!("blue"));
        assert_eq!(model.extra["weight"], json!(169));
        assert_eq!(model.name, "Galaxy S21");
    }

    #[test]
    fn test_new_brand_cannot_smuggle_id_or_count() {
        let new_brand: NewBrand = serde_json::from_value(json!({
            "name": "Acme",
            "id": 99,
            "phoneCount": 7,
            "founded": 1938
        }))
        .unwrap();
        let brand = new_brand.into_brand(3);

        assert_eq!(brand.id, 3);
        assert_eq!(brand.phone_count, 0);
        assert_eq!(brand.extra.len(), 1);
        assert_eq!(brand.extra["founded"], json!(1938));

        let value = serde_json::to_value(&brand).unwrap();
        assert_eq!(value["id"], json!(3));
    }

    #[test]
    fn test_model_matches_any_of_three_fields() {
        let model: PhoneModel = serde_json::from_value(model_json()).unwrap();
        assert!(model.matches("galaxy"));
        assert!(model.matches("samsung"));
        assert!(model.matches("flag"));
        assert!(model.matches(""));
        assert!(!model.matches("pixel"));
    }

    #[test]
    fn test_parse_release_date_formats() {
        let day = parse_release_date("2023-09-22").unwrap();
        assert_eq!(day.to_string(), "2023-09-22 00:00:00");

        let ts = parse_release_date("2023-09-22T10:30:00+02:00").unwrap();
        assert_eq!(ts.to_string(), "2023-09-22 08:30:00");

        assert!(parse_release_date("September 2023").is_none());
    }

    #[test]
    fn test_pagination_total_pages() {
        assert_eq!(Pagination::new(PageRequest::new(1, 10), 0).total_pages, 0);
        assert_eq!(Pagination::new(PageRequest::new(1, 10), 10).total_pages, 1);
        assert_eq!(Pagination::new(PageRequest::new(1, 10), 11).total_pages, 2);
        assert_eq!(Pagination::new(PageRequest::new(1, 0), 11).total_pages, 0);
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(PageRequest::default().offset(), Some(0));
        assert_eq!(PageRequest::new(3, 5).offset(), Some(10));
        assert_eq!(PageRequest::new(0, 5).offset(), None);
    }

    #[test]
    fn test_stats_serialization_shape() {
        let stats = CatalogStats {
            total_brands: 2,
            total_models: 0,
            average_price: 0.0,
            latest_model: None,
        };
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["totalBrands"], json!(2));
        assert_eq!(value["totalModels"], json!(0));
        assert_eq!(value["averagePrice"], json!(0.0));
        assert_eq!(value["latestModel"], json!(null));
    }
}
