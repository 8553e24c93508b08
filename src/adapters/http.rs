use crate::domain::ports::RemoteFetcher;
use crate::utils::error::{CatalogError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Downloads workbooks over HTTP(S). Any failure is returned as `FetchError`.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
    timeout: Option<Duration>,
    headers: HashMap<String, String>,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let fetch_error = |reason: String| CatalogError::FetchError {
            url: url.to_string(),
            reason,
        };

        let mut request = self.client.get(url);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!("Downloading workbook from: {}", url);
        let response = request.send().await.map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        tracing::debug!("Download response status: {}", status);
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        tracing::debug!("Downloaded {} bytes", body.len());
        Ok(body.to_vec())
    }
}
