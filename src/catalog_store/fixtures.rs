//! Seed data for the catalog.

use super::models::{Brand, PhoneModel};
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

const BUILTIN_BRANDS: &str = include_str!("../../fixtures/brands.json");
const BUILTIN_MODELS: &str = include_str!("../../fixtures/models.json");

pub const BRANDS_FILE_NAME: &str = "brands.json";
pub const MODELS_FILE_NAME: &str = "models.json";

/// Immutable snapshot both collections are seeded from, and restored to on
/// reset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fixtures {
    pub brands: Vec<Brand>,
    pub models: Vec<PhoneModel>,
}

impl Fixtures {
    /// Builds a snapshot, deriving every brand's `phone_count` from `models`.
    pub fn new(brands: Vec<Brand>, models: Vec<PhoneModel>) -> Self {
        let mut fixtures = Fixtures { brands, models };
        fixtures.normalize_phone_counts();
        fixtures
    }

    /// The fixtures compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let fixtures =
            Self::from_json(BUILTIN_BRANDS, BUILTIN_MODELS).context("Invalid built-in fixtures")?;
        info!(
            "Loaded built-in fixtures: {} brands, {} models",
            fixtures.brands.len(),
            fixtures.models.len()
        );
        Ok(fixtures)
    }

    pub fn from_json(brands_json: &str, models_json: &str) -> Result<Self> {
        let brands: Vec<Brand> =
            serde_json::from_str(brands_json).context("Failed to parse brands fixture")?;
        let models: Vec<PhoneModel> =
            serde_json::from_str(models_json).context("Failed to parse models fixture")?;
        Ok(Self::new(brands, models))
    }

    /// Reads `brands.json` and `models.json` from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            bail!("{} is not a valid directory.", dir.display());
        }
        let brands_path = dir.join(BRANDS_FILE_NAME);
        let models_path = dir.join(MODELS_FILE_NAME);

        let brands_json = std::fs::read_to_string(&brands_path)
            .with_context(|| format!("Failed to read {}", brands_path.display()))?;
        let models_json = std::fs::read_to_string(&models_path)
            .with_context(|| format!("Failed to read {}", models_path.display()))?;

        let fixtures = Self::from_json(&brands_json, &models_json)
            .with_context(|| format!("Invalid fixtures in {}", dir.display()))?;
        fixtures.report_problems();
        info!(
            "Loaded fixtures from {}: {} brands, {} models",
            dir.display(),
            fixtures.brands.len(),
            fixtures.models.len()
        );
        Ok(fixtures)
    }

    fn normalize_phone_counts(&mut self) {
        for brand in self.brands.iter_mut() {
            brand.phone_count = self
                .models
                .iter()
                .filter(|m| m.brand_id == brand.id)
                .count();
        }
    }

    /// Logs duplicate ids and orphaned models. Neither stops the catalog from
    /// loading.
    fn report_problems(&self) {
        let mut seen = HashSet::new();
        for brand in self.brands.iter() {
            if !seen.insert(brand.id) {
                warn!("Duplicate brand id {} in fixtures", brand.id);
            }
        }

        let brand_ids = seen;
        let mut seen = HashSet::new();
        for model in self.models.iter() {
            if !seen.insert(model.id) {
                warn!("Duplicate model id {} in fixtures", model.id);
            }
            if !brand_ids.contains(&model.brand_id) {
                warn!(
                    "Model {} references missing brand {}",
                    model.id, model.brand_id
                );
            }
        }
    }
}
