use crate::config::toml_config::CatalogConfig;
use crate::utils::error::Result;
use clap::{Parser, ValueEnum};
use std::path::Path;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "catalog.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "sheet-catalog")]
#[command(about = "Render spreadsheet customer and product catalogs into an HTML page")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the customer workbook location (path or URL)
    #[arg(long)]
    pub customers: Option<String>,

    /// Override the product workbook location (path or URL)
    #[arg(long)]
    pub products: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    /// Print the first customer with this id instead of writing the page
    #[arg(long)]
    pub customer_id: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    /// Show what would be processed without executing
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Loads the configuration file (or the built-in defaults when there is
    /// none) and applies command line overrides.
    pub fn load_config(&self) -> Result<CatalogConfig> {
        let mut config = match &self.config {
            Some(path) => CatalogConfig::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                CatalogConfig::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => {
                tracing::info!("No configuration file found, using built-in defaults");
                CatalogConfig::default()
            }
        };

        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut CatalogConfig) {
        if let Some(location) = &self.customers {
            config.customers.location = location.clone();
        }
        if let Some(location) = &self.products {
            config.products.location = location.clone();
        }
        if let Some(output_path) = &self.output_path {
            config.load.output_path = output_path.clone();
        }
    }

    pub fn monitoring_enabled(&self, config: &CatalogConfig) -> bool {
        self.monitor || config.monitoring_enabled()
    }
}
