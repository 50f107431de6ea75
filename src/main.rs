//! catalog-grid - Product catalog search client
//!
//! Loads the product grid for a search term and shows product details.

use anyhow::Result;
use catalog_grid::commands::{ProductCommand, ProductTarget, SearchCommand};
use catalog_grid::config::{Config, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "catalog-grid",
    version,
    about = "Product catalog search client",
    long_about = "Searches a product catalog API and renders the results as a product grid."
)]
struct Cli {
    /// Catalog API key (overrides CATALOG_API_KEY and the config file)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Catalog API root URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the product grid for a search term
    #[command(alias = "s")]
    Search {
        /// Search term (defaults to the configured term)
        term: Option<String>,

        /// Number of products to request
        #[arg(short, long)]
        page_size: Option<u32>,
    },

    /// Show product details by id or grid position
    #[command(alias = "p")]
    Product {
        /// Product id
        #[arg(required_unless_present = "index", conflicts_with = "index")]
        id: Option<String>,

        /// Grid position of the product in the current search
        #[arg(short, long)]
        index: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(key) = cli.api_key {
        config.api_key = Some(key);
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Commands::Search { term, page_size } => {
            if let Some(term) = term {
                config.search_term = term;
            }
            if let Some(size) = page_size {
                config.page_size = size;
            }

            let output = SearchCommand::new(config).execute().await?;
            println!("{}", output);
        }

        Commands::Product { id, index } => {
            let target = match (id, index) {
                (Some(id), _) => ProductTarget::Id(id),
                (None, Some(index)) => ProductTarget::Index(index),
                (None, None) => anyhow::bail!("Provide a product id or --index"),
            };

            let output = ProductCommand::new(config).execute(target).await?;
            println!("{}", output);
        }
    }

    Ok(())
}
