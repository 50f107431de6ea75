//! catalog-grid - Product catalog search client with a grid data source
//!
//! Fetches search results and product details from a catalog REST API,
//! maps them into typed records, and serves them through grid accessors.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod format;
pub mod grid;

pub use catalog::{CatalogClient, Product, ProductsService, SearchResultsProduct, ServiceError};
pub use config::Config;
pub use grid::{GridDataSource, IndexPath, ProductsGridDataSource};
