//! Typed HTTP client for the taskdeck hosted backend.
//!
//! `BackendClient` speaks the backend's two surfaces (auth and table-style
//! REST) and publishes sequence-stamped auth-state changes. `DataStore` layers
//! the application's read/write policy on top: fail-soft reads, tagged-result
//! writes with retry, and a boolean delete.

mod client;
mod events;
mod retry;
mod state;
mod store;

pub use client::{BackendClient, ClientError};
pub use events::{AuthChange, AuthEvents};
pub use retry::{RetryConfig, with_retry};
pub use state::{StoredSession, clear_session, load_session, save_session};
pub use store::DataStore;
