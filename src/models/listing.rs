//! Listing row model representing one entry on a picklist results page.

use serde::{Deserialize, Serialize};

/// One data row from a picklist results table
///
/// Rows are produced while parsing a single listing page and carry no
/// reference back to that page. The published year is kept as the raw
/// cell text; consumers parse it and decide how to handle rows where
/// parsing fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRow {
    /// Link target of the first cell, when the cell carries one
    pub document_url: Option<String>,

    /// Form number as printed in the listing (e.g. "Form 1040")
    pub form_number: String,

    /// Product title
    pub title: String,

    /// Publication year as raw cell text
    pub published_year_text: String,
}

impl ListingRow {
    /// Create a new row
    pub fn new(
        document_url: Option<String>,
        form_number: impl Into<String>,
        title: impl Into<String>,
        published_year_text: impl Into<String>,
    ) -> Self {
        Self {
            document_url,
            form_number: form_number.into(),
            title: title.into(),
            published_year_text: published_year_text.into(),
        }
    }

    /// Parse the publication year, if the cell text is a valid integer
    pub fn published_year(&self) -> Option<i32> {
        self.published_year_text.trim().parse().ok()
    }
}
