//! Document downloads into the local data directory.

use std::path::{Path, PathBuf};

use crate::catalog::{collect_matching, Catalog, CatalogError};

/// Result of a fetch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Number of files written during this run
    pub files_written: usize,

    /// Directory the documents were written into
    pub target_dir: PathBuf,
}

/// Download every document for a form published within the year range
///
/// Re-runs pagination for the search value, then walks the matched rows
/// in order: rows with an unparseable year are skipped with a warning,
/// rows outside `[min_year, max_year]` (inclusive) are skipped
/// silently, and the rest are downloaded into
/// `<data_root>/<search_value>/<year><ext>`. The per-form directory is
/// created lazily, so a run that writes nothing leaves no directory
/// behind. A later row mapping to the same `<year><ext>` replaces the
/// earlier file; the replacement is logged and still counted.
pub async fn fetch_documents(
    catalog: &dyn Catalog,
    search_value: &str,
    min_year: i32,
    max_year: i32,
    data_root: &Path,
) -> Result<FetchOutcome, CatalogError> {
    let rows = collect_matching(catalog, search_value).await?;
    let target_dir = data_root.join(search_value);
    let mut files_written = 0;

    for row in &rows {
        let year = match row.published_year() {
            Some(year) => year,
            None => {
                tracing::warn!(year_text = %row.published_year_text, "skipped bad year");
                continue;
            }
        };
        if year < min_year || year > max_year {
            continue;
        }

        let url = match row.document_url.as_deref() {
            Some(url) => url,
            None => {
                tracing::warn!(
                    form_number = %row.form_number,
                    year,
                    "row has no document link, skipping"
                );
                continue;
            }
        };

        std::fs::create_dir_all(&target_dir)?;

        let bytes = catalog.download(url).await?;
        let file_path = target_dir.join(format!("{}{}", year, extension_for(url)));

        if file_path.exists() {
            tracing::warn!(
                path = %file_path.display(),
                "replacing an existing file for the same year"
            );
        }

        std::fs::write(&file_path, &bytes)?;
        files_written += 1;
    }

    Ok(FetchOutcome {
        files_written,
        target_dir,
    })
}

/// File extension from the URL path suffix, `.bin` when none is present
fn extension_for(url: &str) -> String {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        // Relative link; drop any query or fragment by hand
        Err(_) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
    };

    match Path::new(&path).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!(".{}", ext),
        _ => ".bin".to_string(),
    }
}
