//! Catalog store for phone brands and models.
//!
//! Both collections live in memory behind a single [`CatalogStore`] handle.
//! The store owns the `phoneCount` bookkeeping between brands and models and
//! answers every operation with a [`CatalogResult`], which converts into the
//! uniform `{ success, data, message }` envelope.

mod error;
mod fixtures;
mod models;
mod reply;
mod store;

pub use error::{CatalogError, EntityKind};
pub use fixtures::Fixtures;
pub use models::*;
pub use reply::{ApiResponse, CatalogResult, Reply, ReplyExtra};
pub use store::CatalogStore;
