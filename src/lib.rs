//! Phone Catalog Library
//!
//! In-memory catalog of phone brands and models, with a session gate and a
//! toast notification channel for the front end that drives it.

pub mod catalog_store;
pub mod config;
pub mod latency;
pub mod notifications;
pub mod session;

// Re-export commonly used types for convenience
pub use config::{AppConfig, CliConfig, FileConfig};
pub use catalog_store::{ApiResponse, CatalogError, CatalogResult, CatalogStore, Fixtures, Reply};
pub use latency::{Latency, Operation};
pub use notifications::{NotificationChannel, Toast, ToastType};
pub use session::{FileSessionStore, InMemorySessionStore, SessionGate, SessionStore};
