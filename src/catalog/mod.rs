//! Picklist catalog access.
//!
//! This module defines the [`Catalog`] trait separating the retrieval
//! pipeline from the HTTP transport. [`PicklistCatalog`] talks to the
//! real listing endpoint; [`MockCatalog`] serves scripted pages for
//! tests. Pagination ([`collect_matching`]) and aggregation
//! ([`summarize`]) operate on any `Catalog`.

mod aggregate;
mod paginate;
mod picklist;

pub mod mock;

pub use aggregate::summarize;
pub use mock::MockCatalog;
pub use paginate::collect_matching;
pub use picklist::{PicklistCatalog, PAGE_SIZE};

use crate::models::ListingRow;
use async_trait::async_trait;

/// Access to a paginated form-publication catalog
#[async_trait]
pub trait Catalog: Send + Sync + std::fmt::Debug {
    /// Fetch one listing page for a search value
    ///
    /// An empty page means no result table was present - the normal
    /// end-of-pagination signal, not a failure.
    async fn fetch_page(
        &self,
        search_value: &str,
        page_index: usize,
    ) -> Result<Vec<ListingRow>, CatalogError>;

    /// Download one document as raw bytes
    async fn download(&self, url: &str) -> Result<Vec<u8>, CatalogError>;

    /// Rows per full listing page; a shorter page is the last one
    fn page_size(&self) -> usize {
        PAGE_SIZE
    }
}

/// Errors that can occur while talking to the catalog
///
/// Every variant is fatal to the run: callers propagate these to the
/// top-level handler, which logs and terminates. Tolerated conditions
/// (malformed rows, bad year cells) never surface here.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Network or connection-level failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered with something other than 200
    #[error("unexpected HTTP status: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// The response body could not be read or decoded
    #[error("parse error: {0}")]
    Parse(String),

    /// Filesystem failure while writing a downloaded document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configured HTTP profile could not be turned into a client
    #[error("invalid HTTP configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Transport(err.to_string())
    }
}
