//! Mock catalog for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::catalog::{Catalog, CatalogError};
use crate::models::ListingRow;

/// A mock catalog serving scripted pages and download bodies
///
/// Requested page indexes are recorded so tests can assert that
/// pagination stops where it should.
#[derive(Debug, Default)]
pub struct MockCatalog {
    pages: Vec<Vec<ListingRow>>,
    page_size: usize,
    downloads: HashMap<String, Vec<u8>>,
    page_error: Option<String>,
    requests: Mutex<Vec<usize>>,
}

impl MockCatalog {
    /// Create a mock with the given page size
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    /// Script the sequence of pages to serve
    pub fn with_pages(mut self, pages: Vec<Vec<ListingRow>>) -> Self {
        self.pages = pages;
        self
    }

    /// Script a download body for a URL
    pub fn with_download(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.downloads.insert(url.into(), body.into());
        self
    }

    /// Make every page fetch fail with a transport error
    pub fn with_page_error(mut self, message: impl Into<String>) -> Self {
        self.page_error = Some(message.into());
        self
    }

    /// Page indexes requested so far, in order
    pub fn requested_pages(&self) -> Vec<usize> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn fetch_page(
        &self,
        _search_value: &str,
        page_index: usize,
    ) -> Result<Vec<ListingRow>, CatalogError> {
        self.requests.lock().unwrap().push(page_index);

        if let Some(message) = &self.page_error {
            return Err(CatalogError::Transport(message.clone()));
        }

        Ok(self.pages.get(page_index).cloned().unwrap_or_default())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        self.downloads
            .get(url)
            .cloned()
            .ok_or_else(|| CatalogError::Transport(format!("no scripted body for {}", url)))
    }

    fn page_size(&self) -> usize {
        self.page_size
    }
}
