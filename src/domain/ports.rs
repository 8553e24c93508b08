use crate::domain::model::{PageData, RenderedCatalog};
use crate::utils::error::Result;
use async_trait::async_trait;

/// An opened workbook. Dropping the value releases the document.
pub trait SpreadsheetReader {
    fn sheet_names(&self) -> Vec<String>;

    /// The workbook's own name for `sheet`. Names compare without regard to
    /// case; an exact match wins over a case-folded one.
    fn resolve_sheet(&self, sheet: &str) -> Option<String> {
        let names = self.sheet_names();
        if names.iter().any(|name| name == sheet) {
            return Some(sheet.to_string());
        }
        let wanted = sheet.to_lowercase();
        names.into_iter().find(|name| name.to_lowercase() == wanted)
    }

    /// All rows of `sheet`, starting at the first sheet row.
    /// Fails with `SheetNotFound` when the workbook has no such sheet.
    fn rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>>;
}

#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

pub trait PageRenderer: Send + Sync {
    fn render(&self, page: &PageData) -> Result<String>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<PageData>;
    async fn transform(&self, page: PageData) -> Result<RenderedCatalog>;
    async fn load(&self, rendered: RenderedCatalog) -> Result<String>;
}
