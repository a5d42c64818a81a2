//! Aggregation of matched listing rows into per-form summaries.

use crate::models::{FormSummary, ListingRow};

/// Reduce matched rows to a single summary
///
/// The first non-empty form number and title win; later rows never
/// overwrite them, since every row already passed the canonical filter
/// and is treated as the same form. Rows whose year cell does not parse
/// contribute nothing to the year span but are logged. Returns `None`
/// when no row carried a form number at all.
pub fn summarize(rows: &[ListingRow]) -> Option<FormSummary> {
    let mut form_number: Option<String> = None;
    let mut form_title: Option<String> = None;
    let mut min_year: Option<i32> = None;
    let mut max_year: Option<i32> = None;

    for row in rows {
        if form_number.is_none() && !row.form_number.is_empty() {
            form_number = Some(row.form_number.clone());
        }
        if form_title.is_none() && !row.title.is_empty() {
            form_title = Some(row.title.clone());
        }

        let year = match row.published_year() {
            Some(year) => year,
            None => {
                tracing::warn!(year_text = %row.published_year_text, "skipped bad year");
                continue;
            }
        };

        min_year = Some(min_year.map_or(year, |min| min.min(year)));
        max_year = Some(max_year.map_or(year, |max| max.max(year)));
    }

    Some(FormSummary {
        form_number: form_number?,
        form_title: form_title.unwrap_or_default(),
        min_year,
        max_year,
    })
}
