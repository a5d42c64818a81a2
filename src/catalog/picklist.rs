//! IRS prior-forms picklist catalog implementation.

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::catalog::{Catalog, CatalogError};
use crate::config::Config;
use crate::models::ListingRow;
use crate::utils;

/// Rows requested per listing page
pub const PAGE_SIZE: usize = 200;

/// Catalog backed by the IRS picklist endpoint
///
/// One instance per top-level operation; the client's connection pool
/// is released when the catalog is dropped.
#[derive(Debug, Clone)]
pub struct PicklistCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl PicklistCatalog {
    /// Build a catalog from configuration
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let client = utils::build_client(&config.http)
            .map_err(|e| CatalogError::Config(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.listing.base_url.clone(),
        })
    }
}

#[async_trait]
impl Catalog for PicklistCatalog {
    async fn fetch_page(
        &self,
        search_value: &str,
        page_index: usize,
    ) -> Result<Vec<ListingRow>, CatalogError> {
        let query: [(&str, String); 6] = [
            ("indexOfFirstRow", (page_index * PAGE_SIZE).to_string()),
            ("sortColumn", "sortOrder".to_string()),
            ("value", search_value.to_string()),
            ("criteria", "formNumber".to_string()),
            ("resultsPerPage", PAGE_SIZE.to_string()),
            ("isDescending", "false".to_string()),
        ];

        tracing::debug!(search_value, page_index, "fetching listing page");

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(CatalogError::HttpStatus(status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Parse(format!("failed to read listing page: {}", e)))?;

        Ok(parse_listing(&body))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        tracing::debug!(url, "downloading document");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(CatalogError::HttpStatus(status));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

/// Parse the rows of a listing page
///
/// Absent result table yields an empty page. The header row is skipped,
/// and so is any data row with fewer than three cells.
fn parse_listing(html: &str) -> Vec<ListingRow> {
    let document = Html::parse_document(html);

    let (Ok(table_selector), Ok(row_selector), Ok(cell_selector), Ok(link_selector)) = (
        Selector::parse("table.picklist-dataTable"),
        Selector::parse("tr"),
        Selector::parse("td"),
        Selector::parse("a"),
    ) else {
        return Vec::new();
    };

    let table = match document.select(&table_selector).next() {
        Some(table) => table,
        None => return Vec::new(),
    };

    let mut rows = Vec::new();
    for tr in table.select(&row_selector).skip(1) {
        let cells: Vec<_> = tr.select(&cell_selector).collect();
        if cells.len() < 3 {
            continue;
        }

        let text = |i: usize| {
            cells[i]
                .text()
                .collect::<String>()
                .trim()
                .to_string()
        };

        let document_url = cells[0]
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string);

        rows.push(ListingRow::new(document_url, text(0), text(1), text(2)));
    }

    rows
}
