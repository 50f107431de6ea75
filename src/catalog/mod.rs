//! Catalog API modules for the HTTP client, error taxonomy, and data models.

pub mod client;
pub mod error;
pub mod models;

pub use client::{CatalogClient, DetailResult, ProductsService, SearchResult};
pub use error::ServiceError;
pub use models::{Product, SearchResultsProduct};
