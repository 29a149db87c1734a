//! Headless admin client for the FlowDesk furniture-sourcing service.
//!
//! `api` talks to the REST backend with retry and bearer auth, `aggregator`
//! rebuilds the cross-entity views the backend cannot serve directly, and
//! `session` persists the signed-in admin's state between runs.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod session;
pub mod types;
pub(crate) mod util;

pub use aggregator::Aggregator;
pub use api::{ApiClient, ApiError, RetryPolicy};
pub use config::AppConfig;
pub use session::CustomerStore;
