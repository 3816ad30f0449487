//! Library layer for the krestate toolkit: cached resilient client,
//! payload normalizers, summary statistics, and validated tool operations
//! over the Korean government open-data endpoints.
//!
//! Wraps the `krestate_api` fetch core with an in-memory TTL cache,
//! input validation, per-family record normalization, and the
//! serializable error payload shape shared by every operation.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod parsers;
pub mod region;
pub mod summary;
pub mod tools;
pub mod validation;

pub use krestate_api;
pub use krestate_api::{endpoints, FetchConfig, FetchError, OpenDataClient};

pub use cache::ApiCache;
pub use client::CachedClient;
pub use config::Config;
pub use error::{ErrorKind, ToolError};
pub use tools::OpenDataTools;
