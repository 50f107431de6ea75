//! Product detail command implementation.

use crate::catalog::{CatalogClient, ProductsService};
use crate::config::Config;
use crate::format::Formatter;
use crate::grid::{IndexPath, ProductsGridDataSource};
use anyhow::{Context, Result};
use tracing::info;

/// Which product to fetch details for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductTarget {
    /// A catalog product id
    Id(String),
    /// A position in the search grid
    Index(usize),
}

/// Fetches and renders a product detail record.
pub struct ProductCommand {
    config: Config,
}

impl ProductCommand {
    /// Creates a new product command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches a product and returns formatted output.
    pub async fn execute(&self, target: ProductTarget) -> Result<String> {
        let client = CatalogClient::new(&self.config)?;

        self.execute_with_service(client, target).await
    }

    /// Fetches a product with a provided service (for testing).
    pub async fn execute_with_service(
        &self,
        service: impl ProductsService,
        target: ProductTarget,
    ) -> Result<String> {
        let product = match target {
            ProductTarget::Id(id) => {
                let id = id.trim();
                if id.is_empty() {
                    anyhow::bail!("Product id must not be empty");
                }

                info!("Looking up product: {}", id);
                service
                    .fetch_product_details(id)
                    .await
                    .with_context(|| format!("Failed to fetch product {}", id))?
            }
            ProductTarget::Index(index) => {
                let mut data_source = ProductsGridDataSource::new(service);
                data_source.load_data().await.context("Search failed")?;

                let selected = data_source
                    .product_for(IndexPath::new(0, index))
                    .with_context(|| format!("No product at grid position {}", index))?;

                info!("Looking up product at position {}: {}", index, selected.product_id);
                data_source
                    .service()
                    .fetch_product_details(&selected.product_id)
                    .await
                    .with_context(|| format!("Failed to fetch product {}", selected.product_id))?
            }
        };

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_product(&product))
    }
}
