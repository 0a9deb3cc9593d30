//! In-memory catalog store.

use super::error::{CatalogError, EntityKind};
use super::fixtures::Fixtures;
use super::models::{
    Brand, BrandPatch, CatalogStats, NewBrand, NewPhoneModel, PageRequest, Pagination,
    PhoneModel, PhoneModelPatch,
};
use super::reply::{CatalogResult, Reply};
use crate::latency::{Latency, Operation};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// The two live collections.
#[derive(Debug, Clone)]
struct Collections {
    brands: Vec<Brand>,
    models: Vec<PhoneModel>,
}

impl Collections {
    fn from_fixtures(fixtures: &Fixtures) -> Self {
        Collections {
            brands: fixtures.brands.clone(),
            models: fixtures.models.clone(),
        }
    }

    fn count_models_of(&self, brand_id: i64) -> usize {
        self.models.iter().filter(|m| m.brand_id == brand_id).count()
    }

    /// Recomputes `phone_count` for `brand_id`, if such a brand exists.
    fn refresh_phone_count(&mut self, brand_id: i64) {
        let count = self.count_models_of(brand_id);
        if let Some(brand) = self.brands.iter_mut().find(|b| b.id == brand_id) {
            brand.phone_count = count;
        }
    }

    fn next_brand_id(&self) -> Option<i64> {
        next_id(self.brands.iter().map(|b| b.id))
    }

    fn next_model_id(&self) -> Option<i64> {
        next_id(self.models.iter().map(|m| m.id))
    }
}

/// One past the largest id, or 1 for an empty collection. None once the
/// largest id is `i64::MAX`.
fn next_id(ids: impl Iterator<Item = i64>) -> Option<i64> {
    ids.max().unwrap_or(0).max(0).checked_add(1)
}

/// Owns the Brands and Models collections and keeps `phone_count` in sync.
///
/// Cloning is cheap and every clone shares the same collections. Operations
/// take one exclusive lock for their whole read-modify-write, so each one is
/// atomic with respect to the others; the lock is never held across the
/// simulated latency.
#[derive(Clone)]
pub struct CatalogStore {
    snapshot: Arc<Fixtures>,
    collections: Arc<Mutex<Collections>>,
    latency: Latency,
}

impl CatalogStore {
    pub fn new(fixtures: Fixtures) -> Self {
        info!(
            "Catalog seeded with {} brands and {} models",
            fixtures.brands.len(),
            fixtures.models.len()
        );
        let collections = Collections::from_fixtures(&fixtures);
        CatalogStore {
            snapshot: Arc::new(fixtures),
            collections: Arc::new(Mutex::new(collections)),
            latency: Latency::None,
        }
    }

    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }

    /// The snapshot `reset_data` restores.
    pub fn fixtures(&self) -> &Fixtures {
        &self.snapshot
    }

    /// Current brands, as stored. No latency.
    pub fn current_brands(&self) -> Vec<Brand> {
        self.lock().brands.clone()
    }

    /// Current models, in collection order. No latency.
    pub fn current_models(&self) -> Vec<PhoneModel> {
        self.lock().models.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        // Every operation leaves the collections consistent before it can
        // panic, so a poisoned lock still guards valid data.
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Brands
    // =========================================================================

    /// All brands, each with a `phone_count` computed right now.
    pub async fn fetch_brands(&self) -> CatalogResult<Vec<Brand>> {
        self.latency.wait(Operation::FetchBrands).await;
        let collections = self.lock();
        let brands = collections
            .brands
            .iter()
            .map(|brand| Brand {
                phone_count: collections.count_models_of(brand.id),
                ..brand.clone()
            })
            .collect();
        Ok(Reply::new(brands, "Brands fetched successfully"))
    }

    pub async fn fetch_brand(&self, id: i64) -> CatalogResult<Brand> {
        self.latency.wait(Operation::FetchBrand).await;
        let collections = self.lock();
        collections
            .brands
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .map(|brand| Reply::new(brand, "Brand fetched successfully"))
            .ok_or(CatalogError::NotFound(EntityKind::Brand))
    }

    pub async fn create_brand(&self, new_brand: NewBrand) -> CatalogResult<Brand> {
        self.latency.wait(Operation::CreateBrand).await;
        let mut collections = self.lock();
        let Some(id) = collections.next_brand_id() else {
            warn!("Cannot create brand {}: brand ids exhausted", new_brand.name);
            return Err(CatalogError::IdsExhausted(EntityKind::Brand));
        };
        let brand = new_brand.into_brand(id);
        collections.brands.push(brand.clone());
        debug!("Created brand {} ({})", brand.id, brand.name);
        Ok(Reply::new(brand, "Brand created successfully"))
    }

    pub async fn update_brand(&self, id: i64, patch: BrandPatch) -> CatalogResult<Brand> {
        self.latency.wait(Operation::UpdateBrand).await;
        let mut collections = self.lock();
        let brand = collections
            .brands
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(CatalogError::NotFound(EntityKind::Brand))?;
        brand.apply(patch);
        debug!("Updated brand {}", id);
        Ok(Reply::new(brand.clone(), "Brand updated successfully"))
    }

    /// Removes a brand, unless some model still references it.
    pub async fn delete_brand(&self, id: i64) -> CatalogResult<()> {
        self.latency.wait(Operation::DeleteBrand).await;
        let mut collections = self.lock();
        let index = collections
            .brands
            .iter()
            .position(|b| b.id == id)
            .ok_or(CatalogError::NotFound(EntityKind::Brand))?;

        let models = collections.count_models_of(id);
        if models > 0 {
            warn!("Refusing to delete brand {}: {} models reference it", id, models);
            return Err(CatalogError::ReferentialConflict {
                brand_id: id,
                models,
            });
        }

        collections.brands.remove(index);
        debug!("Deleted brand {}", id);
        Ok(Reply::new((), "Brand deleted successfully"))
    }

    // =========================================================================
    // Phone models
    // =========================================================================

    /// One page of models in collection order. Pages past the end are empty.
    pub async fn fetch_phone_models(&self, request: PageRequest) -> CatalogResult<Vec<PhoneModel>> {
        self.latency.wait(Operation::FetchPhoneModels).await;
        let collections = self.lock();
        let total = collections.models.len();
        let page: Vec<PhoneModel> = match request.offset() {
            Some(offset) if offset < total => collections.models[offset..]
                .iter()
                .take(request.limit)
                .cloned()
                .collect(),
            _ => Vec::new(),
        };
        Ok(Reply::new(page, "Models fetched successfully")
            .with_pagination(Pagination::new(request, total)))
    }

    pub async fn fetch_phone_model(&self, id: i64) -> CatalogResult<PhoneModel> {
        self.latency.wait(Operation::FetchPhoneModel).await;
        let collections = self.lock();
        collections
            .models
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .map(|model| Reply::new(model, "Model fetched successfully"))
            .ok_or(CatalogError::NotFound(EntityKind::Model))
    }

    /// Appends a model. A `brand_id` that matches no brand is accepted.
    pub async fn create_phone_model(&self, new_model: NewPhoneModel) -> CatalogResult<PhoneModel> {
        self.latency.wait(Operation::CreatePhoneModel).await;
        let mut collections = self.lock();
        let Some(id) = collections.next_model_id() else {
            warn!("Cannot create model {}: model ids exhausted", new_model.name);
            return Err(CatalogError::IdsExhausted(EntityKind::Model));
        };
        let model = new_model.into_model(id);
        collections.models.push(model.clone());
        collections.refresh_phone_count(model.brand_id);
        debug!(
            "Created model {} ({}) for brand {}",
            model.id, model.name, model.brand_id
        );
        Ok(Reply::new(model, "Model created successfully"))
    }

    /// Shallow update. Moving a model to another brand refreshes the counts of
    /// both brands.
    pub async fn update_phone_model(
        &self,
        id: i64,
        patch: PhoneModelPatch,
    ) -> CatalogResult<PhoneModel> {
        self.latency.wait(Operation::UpdatePhoneModel).await;
        let mut collections = self.lock();
        let model = collections
            .models
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(CatalogError::NotFound(EntityKind::Model))?;

        let old_brand_id = model.brand_id;
        let reassigned_to = patch.brand_id.filter(|new_id| *new_id != old_brand_id);
        model.apply(patch);
        let updated = model.clone();

        if let Some(new_brand_id) = reassigned_to {
            collections.refresh_phone_count(old_brand_id);
            collections.refresh_phone_count(new_brand_id);
            debug!(
                "Moved model {} from brand {} to brand {}",
                id, old_brand_id, new_brand_id
            );
        }
        debug!("Updated model {}", id);
        Ok(Reply::new(updated, "Model updated successfully"))
    }

    pub async fn delete_phone_model(&self, id: i64) -> CatalogResult<()> {
        self.latency.wait(Operation::DeletePhoneModel).await;
        let mut collections = self.lock();
        let index = collections
            .models
            .iter()
            .position(|m| m.id == id)
            .ok_or(CatalogError::NotFound(EntityKind::Model))?;

        let removed = collections.models.remove(index);
        collections.refresh_phone_count(removed.brand_id);
        debug!("Deleted model {}", id);
        Ok(Reply::new((), "Model deleted successfully"))
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Case-insensitive substring search over name, brand name and
    /// description. Not paginated.
    pub async fn search_phones(&self, query: &str) -> CatalogResult<Vec<PhoneModel>> {
        self.latency.wait(Operation::SearchPhones).await;
        let needle = query.to_lowercase();
        let collections = self.lock();
        let found: Vec<PhoneModel> = collections
            .models
            .iter()
            .filter(|m| m.matches(&needle))
            .cloned()
            .collect();
        let message = format!("Found {} results", found.len());
        Ok(Reply::new(found, message).with_query(query))
    }

    pub async fn fetch_phones_by_brand(&self, brand_id: i64) -> CatalogResult<Vec<PhoneModel>> {
        self.latency.wait(Operation::FetchPhonesByBrand).await;
        let collections = self.lock();
        let found: Vec<PhoneModel> = collections
            .models
            .iter()
            .filter(|m| m.brand_id == brand_id)
            .cloned()
            .collect();
        let message = format!("Found {} models for brand", found.len());
        Ok(Reply::new(found, message).with_brand_id(brand_id))
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    /// Totals, mean price and most recently released model. Leaves the
    /// collection order untouched.
    pub async fn get_stats(&self) -> CatalogResult<CatalogStats> {
        self.latency.wait(Operation::GetStats).await;
        let collections = self.lock();
        let models = &collections.models;

        let average_price = if models.is_empty() {
            0.0
        } else {
            let sum: f64 = models.iter().map(|m| m.price.unwrap_or(0.0)).sum();
            sum / models.len() as f64
        };

        // Models without a parseable date rank below every dated one. On a
        // tie the earliest model in collection order wins.
        let latest_model = models.iter().rev().max_by_key(|m| m.released_at()).cloned();

        let stats = CatalogStats {
            total_brands: collections.brands.len(),
            total_models: models.len(),
            average_price,
            latest_model,
        };
        Ok(Reply::new(stats, "Statistics fetched successfully"))
    }

    /// Throws away every change and goes back to the fixture snapshot.
    pub async fn reset_data(&self) -> CatalogResult<()> {
        self.latency.wait(Operation::ResetData).await;
        let mut collections = self.lock();
        *collections = Collections::from_fixtures(&self.snapshot);
        info!("Catalog reset to fixtures");
        Ok(Reply::new((), "Data reset successfully"))
    }
}
