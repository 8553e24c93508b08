use crate::adapters::html::HtmlRenderer;
use crate::adapters::http::HttpFetcher;
use crate::config::toml_config::{CatalogConfig, SheetSourceConfig};
use crate::core::source::{self, SourceLocation};
use crate::core::{PageRenderer, Pipeline, RemoteFetcher, Storage};
use crate::domain::model::{
    CustomerRecord, PageData, ProductRecord, RecordSet, RenderedCatalog, SheetRecord,
};
use crate::utils::error::{CatalogError, Result};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;
use zip::write::{FileOptions, ZipWriter};

/// Reads the customer and product workbooks and publishes them as a page.
pub struct CatalogPipeline<S: Storage, F: RemoteFetcher = HttpFetcher> {
    pub(crate) storage: S,
    pub(crate) fetcher: F,
    pub(crate) renderer: Box<dyn PageRenderer>,
    pub(crate) config: CatalogConfig,
}

impl<S: Storage> CatalogPipeline<S, HttpFetcher> {
    pub fn new(storage: S, config: CatalogConfig) -> Self {
        let mut fetcher = HttpFetcher::new();
        if let Some(timeout) = config.fetch.timeout_seconds {
            fetcher = fetcher.with_timeout(Duration::from_secs(timeout));
        }
        if let Some(headers) = &config.fetch.headers {
            fetcher = fetcher.with_headers(headers.clone());
        }
        Self::with_fetcher(storage, fetcher, config)
    }
}

impl<S: Storage, F: RemoteFetcher> CatalogPipeline<S, F> {
    pub fn with_fetcher(storage: S, fetcher: F, config: CatalogConfig) -> Self {
        let renderer = Box::new(HtmlRenderer::new(config.page.title.clone()));
        Self {
            storage,
            fetcher,
            renderer,
            config,
        }
    }

    pub fn with_renderer<P: PageRenderer + 'static>(mut self, renderer: P) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    async fn load_source(&self, kind: &str, location: &SourceLocation) -> Result<Vec<u8>> {
        tracing::info!("📥 Loading {} workbook from: {}", kind, location);
        source::load_bytes(location, &self.fetcher)
            .await
            .inspect_err(|e| tracing::error!("Error reading {} data: {}", kind, e))
    }
}

fn extract_records<R: SheetRecord>(
    source: &SheetSourceConfig,
    location: &SourceLocation,
    bytes: &[u8],
) -> Result<RecordSet<R>> {
    source
        .extractor::<R>()?
        .extract_bytes(&location.to_string(), bytes)
        .inspect_err(|e| tracing::error!("Error reading {} data: {}", R::KIND, e))
}

fn to_csv<T: Serialize>(records: &RecordSet<T>) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CatalogError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| CatalogError::RenderError {
        message: e.to_string(),
    })
}

#[async_trait::async_trait]
impl<S: Storage, F: RemoteFetcher> Pipeline for CatalogPipeline<S, F> {
    async fn extract(&self) -> Result<PageData> {
        let customer_location = self.config.customers.source_location();
        let product_location = self.config.products.source_location();

        let customer_bytes = self.load_source(CustomerRecord::KIND, &customer_location).await?;
        // One download serves both catalogs when they share a workbook.
        let product_bytes = if product_location == customer_location {
            tracing::debug!("Product catalog shares the customer workbook");
            None
        } else {
            Some(self.load_source(ProductRecord::KIND, &product_location).await?)
        };

        let customers = extract_records::<CustomerRecord>(
            &self.config.customers,
            &customer_location,
            &customer_bytes,
        )?;
        let products = extract_records::<ProductRecord>(
            &self.config.products,
            &product_location,
            product_bytes.as_deref().unwrap_or(customer_bytes.as_slice()),
        )?;

        let generated_at = chrono::Local::now()
            .format(&self.config.page.timestamp_format)
            .to_string();

        tracing::info!(
            "📊 Extracted {} customers and {} products",
            customers.len(),
            products.len()
        );
        Ok(PageData {
            customers,
            products,
            generated_at,
        })
    }

    async fn transform(&self, page: PageData) -> Result<RenderedCatalog> {
        let mut rendered = RenderedCatalog::default();

        if self.config.wants_format("html") {
            rendered.html = Some(self.renderer.render(&page)?);
        }
        if self.config.wants_format("json") {
            rendered.json = Some(serde_json::to_string_pretty(&page)?);
        }
        if self.config.wants_format("csv") {
            rendered.customers_csv = Some(to_csv(&page.customers)?);
            rendered.products_csv = Some(to_csv(&page.products)?);
        }

        tracing::info!("🔧 Rendered catalog generated at {}", page.generated_at);
        Ok(rendered)
    }

    async fn load(&self, rendered: RenderedCatalog) -> Result<String> {
        let names = self.config.filenames();
        let files: Vec<(String, String)> = [
            (names.html.unwrap_or_else(|| "index.html".to_string()), rendered.html),
            (names.json.unwrap_or_else(|| "catalog.json".to_string()), rendered.json),
            (
                names.customers_csv.unwrap_or_else(|| "customers.csv".to_string()),
                rendered.customers_csv,
            ),
            (
                names.products_csv.unwrap_or_else(|| "products.csv".to_string()),
                rendered.products_csv,
            ),
        ]
        .into_iter()
        .filter_map(|(name, content)| content.map(|content| (name, content)))
        .collect();

        if files.is_empty() {
            return Err(CatalogError::RenderError {
                message: "nothing to write".to_string(),
            });
        }

        let output_dir = self.config.output_path();

        if let Some(compression) = self.config.load.compression.as_ref().filter(|c| c.enabled) {
            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, content) in &files {
                    zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                    zip.write_all(content.as_bytes())?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage
                .write_file(&compression.filename, &zip_data)
                .await?;

            let output_path = format!("{}/{}", output_dir, compression.filename);
            tracing::info!("📦 Catalog bundle saved: {}", output_path);
            return Ok(output_path);
        }

        for (name, content) in &files {
            self.storage.write_file(name, content.as_bytes()).await?;
            tracing::debug!("Wrote {} ({} bytes)", name, content.len());
        }

        let output_path = format!("{}/{}", output_dir, files[0].0);
        tracing::info!("💾 Catalog page saved: {}", output_path);
        Ok(output_path)
    }
}
