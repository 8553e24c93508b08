pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{html::HtmlRenderer, http::HttpFetcher, storage::LocalStorage};
pub use app::pipelines::catalog_pipeline::CatalogPipeline;
pub use config::CatalogConfig;
pub use core::extractor::{ColumnMap, SheetExtractor};
pub use core::etl::EtlEngine;
pub use domain::model::{CustomerRecord, PageData, ProductRecord, RecordSet};
pub use utils::error::{CatalogError, Result};
