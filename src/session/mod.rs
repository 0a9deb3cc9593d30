//! Admin session gate.
//!
//! A single static credential pair guards the admin side of the catalog.
//! The session survives restarts through a small key/value store.

mod file_store;
mod gate;
mod models;
mod store;

pub use file_store::FileSessionStore;
pub use gate::{SessionGate, AUTH_TOKEN_KEY, USER_DATA_KEY};
pub use models::{AdminCredentials, LoginOutcome, SessionToken, SessionUser};
pub use store::{InMemorySessionStore, SessionStore};
