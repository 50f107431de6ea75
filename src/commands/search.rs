//! Search command implementation.

use crate::catalog::{CatalogClient, ProductsService};
use crate::config::Config;
use crate::format::Formatter;
use crate::grid::{render_cells, GridDataSource, ProductsGridDataSource};
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Loads the product grid and renders its cells.
pub struct SearchCommand {
    config: Config,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the search and returns formatted output.
    pub async fn execute(&self) -> Result<String> {
        let client = CatalogClient::new(&self.config)?;

        self.execute_with_service(client).await
    }

    /// Executes the search with a provided service (for testing).
    pub async fn execute_with_service(&self, service: impl ProductsService) -> Result<String> {
        info!("Searching for: {}", self.config.search_term);

        let mut data_source = ProductsGridDataSource::new(service);
        data_source.load_data().await.context("Search failed")?;

        debug!(
            "Grid has {} sections, {} items",
            data_source.number_of_sections(),
            data_source.number_of_items(0)
        );

        let cells = render_cells(&data_source);

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_cells(&cells))
    }
}
