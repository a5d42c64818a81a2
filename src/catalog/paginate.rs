//! Pagination over the listing endpoint.

use crate::catalog::{Catalog, CatalogError};
use crate::models::ListingRow;
use crate::utils;

/// Collect every row whose form number canonically matches the search value
///
/// The endpoint does fuzzy server-side matching and may return rows for
/// unrelated form numbers sharing the search string, so each row is
/// re-checked for canonical equality. Pages are walked in order from
/// index 0; an empty page or a page shorter than the catalog's page
/// size is the last one. Termination looks at the unfiltered page
/// length - a full page of non-matching rows still means there may be
/// more pages.
pub async fn collect_matching(
    catalog: &dyn Catalog,
    search_value: &str,
) -> Result<Vec<ListingRow>, CatalogError> {
    let mut matched = Vec::new();
    let mut page_index = 0;

    loop {
        let page = catalog.fetch_page(search_value, page_index).await?;
        if page.is_empty() {
            break;
        }

        let page_len = page.len();
        matched.extend(
            page.into_iter()
                .filter(|row| utils::equal(&row.form_number, search_value)),
        );

        if page_len < catalog.page_size() {
            break;
        }
        page_index += 1;
    }

    tracing::debug!(search_value, rows = matched.len(), "pagination complete");
    Ok(matched)
}
