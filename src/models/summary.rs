//! Per-form summary model aggregated from matched listing rows.

use serde::{Deserialize, Serialize};

/// Aggregate record for one requested form number
///
/// `form_number` and `form_title` come from the first matched row that
/// carried them; `min_year`/`max_year` span every matched row with a
/// parseable publication year. Both year fields stay unset when no row
/// had one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSummary {
    /// Canonical form number as printed in the listing
    pub form_number: String,

    /// Product title
    pub form_title: String,

    /// Earliest publication year observed
    pub min_year: Option<i32>,

    /// Latest publication year observed
    pub max_year: Option<i32>,
}

impl FormSummary {
    /// Number of calendar years covered, inclusive, when both bounds are known
    pub fn year_span(&self) -> Option<i32> {
        match (self.min_year, self.max_year) {
            (Some(min), Some(max)) => Some(max - min + 1),
            _ => None,
        }
    }
}
