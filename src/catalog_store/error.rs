use std::fmt;
use thiserror::Error;

/// The two collections of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Brand,
    Model,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Brand => write!(f, "Brand"),
            EntityKind::Model => write!(f, "Model"),
        }
    }
}

/// Errors reported by catalog operations.
///
/// A failed operation never touches the collections, so callers only need to
/// surface the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("{0} not found")]
    NotFound(EntityKind),

    #[error("Cannot delete brand. It has {models} associated models.")]
    ReferentialConflict { brand_id: i64, models: usize },

    #[error("No {} ids left", .0.to_string().to_lowercase())]
    IdsExhausted(EntityKind),
}
