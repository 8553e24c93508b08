use crate::domain::ports::RemoteFetcher;
use crate::utils::error::{CatalogError, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// Where a catalog workbook lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Local(PathBuf),
    Remote(Url),
}

impl SourceLocation {
    /// http(s) URLs are remote; anything else is treated as a file path.
    pub fn parse(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => SourceLocation::Remote(url),
            _ => SourceLocation::Local(PathBuf::from(location)),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, SourceLocation::Remote(_))
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceLocation::Local(path) => write!(f, "{}", path.display()),
            SourceLocation::Remote(url) => write!(f, "{}", url),
        }
    }
}

pub fn resolve_local(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|source| CatalogError::PathResolutionError {
        path: path.display().to_string(),
        source,
    })
}

/// Reads a workbook from disk. Unreadable files surface as `OpenError`.
pub fn read_local(path: &Path) -> Result<Vec<u8>> {
    let absolute = resolve_local(path)?;
    tracing::debug!("Reading workbook from {}", absolute.display());
    std::fs::read(&absolute).map_err(|e| CatalogError::OpenError {
        location: absolute.display().to_string(),
        reason: e.to_string(),
    })
}

pub async fn load_bytes<F: RemoteFetcher + ?Sized>(
    location: &SourceLocation,
    fetcher: &F,
) -> Result<Vec<u8>> {
    match location {
        SourceLocation::Local(path) => read_local(path),
        SourceLocation::Remote(url) => fetcher.fetch(url.as_str()).await,
    }
}
