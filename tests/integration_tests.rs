//! Integration tests for formpick
//!
//! These tests run the listing pipeline end to end against a local HTTP
//! server serving canned picklist pages.

use formpick::archive::fetch_documents;
use formpick::catalog::{collect_matching, summarize, CatalogError, PicklistCatalog, PAGE_SIZE};
use formpick::config::Config;
use mockito::Matcher;

/// Render a picklist results page with a header row plus the given
/// (form number, title, year, optional href) rows.
fn page_html(rows: &[(&str, &str, &str, Option<&str>)]) -> String {
    let mut body = String::from(
        "<html><body><table class=\"picklist-dataTable\">\n\
         <tr><th>Product Number</th><th>Title</th><th>Revision Date</th></tr>\n",
    );
    for (number, title, year, href) in rows {
        let first_cell = match href {
            Some(href) => format!("<a href=\"{}\">{}</a>", href, number),
            None => (*number).to_string(),
        };
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            first_cell, title, year
        ));
    }
    body.push_str("</table></body></html>");
    body
}

fn catalog_for(server: &mockito::ServerGuard) -> PicklistCatalog {
    let mut config = Config::default();
    config.listing.base_url = format!("{}/picklist", server.url());
    PicklistCatalog::new(&config).expect("catalog should build from default config")
}

fn listing_query(index_of_first_row: usize, value: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("indexOfFirstRow".into(), index_of_first_row.to_string()),
        Matcher::UrlEncoded("sortColumn".into(), "sortOrder".into()),
        Matcher::UrlEncoded("value".into(), value.into()),
        Matcher::UrlEncoded("criteria".into(), "formNumber".into()),
        Matcher::UrlEncoded("resultsPerPage".into(), PAGE_SIZE.to_string()),
        Matcher::UrlEncoded("isDescending".into(), "false".into()),
    ])
}

#[tokio::test]
async fn test_list_pipeline_filters_and_aggregates() {
    let mut server = mockito::Server::new_async().await;

    let listing = server
        .mock("GET", "/picklist")
        .match_query(listing_query(0, "1099"))
        .match_header("user-agent", Matcher::Regex("Mozilla".into()))
        .match_header("accept-language", "en-US,en;q=0.9")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(page_html(&[
            ("1099", "Miscellaneous Income", "2019", Some("/pub/f1099--2019.pdf")),
            ("1099-MISC", "Miscellaneous Information", "2020", None),
            ("1099", "Miscellaneous Income", "2020", Some("/pub/f1099--2020.pdf")),
        ]))
        .expect(1)
        .create_async()
        .await;

    let catalog = catalog_for(&server);
    let rows = collect_matching(&catalog, "1099").await.unwrap();

    // The fuzzy 1099-MISC row is filtered out
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.form_number == "1099"));

    let summary = summarize(&rows).unwrap();
    assert_eq!(summary.form_number, "1099");
    assert_eq!(summary.form_title, "Miscellaneous Income");
    assert_eq!(summary.min_year, Some(2019));
    assert_eq!(summary.max_year, Some(2020));

    // The page was short, so no second request went out
    listing.assert_async().await;
}

#[tokio::test]
async fn test_pagination_walks_until_short_page() {
    let mut server = mockito::Server::new_async().await;

    let full_page: Vec<(String, String, String)> = (0..PAGE_SIZE)
        .map(|i| {
            (
                "1040".to_string(),
                "US Individual Income Tax Return".to_string(),
                (1821 + i as i32).to_string(),
            )
        })
        .collect();
    let full_page_rows: Vec<(&str, &str, &str, Option<&str>)> = full_page
        .iter()
        .map(|(n, t, y)| (n.as_str(), t.as_str(), y.as_str(), None))
        .collect();

    let page_zero = server
        .mock("GET", "/picklist")
        .match_query(listing_query(0, "1040"))
        .with_status(200)
        .with_body(page_html(&full_page_rows))
        .expect(1)
        .create_async()
        .await;

    let page_one = server
        .mock("GET", "/picklist")
        .match_query(listing_query(PAGE_SIZE, "1040"))
        .with_status(200)
        .with_body(page_html(&[(
            "1040",
            "US Individual Income Tax Return",
            "2021",
            None,
        )]))
        .expect(1)
        .create_async()
        .await;

    let catalog = catalog_for(&server);
    let rows = collect_matching(&catalog, "1040").await.unwrap();

    assert_eq!(rows.len(), PAGE_SIZE + 1);
    assert_eq!(rows.first().unwrap().published_year_text, "1821");
    assert_eq!(rows.last().unwrap().published_year_text, "2021");

    page_zero.assert_async().await;
    page_one.assert_async().await;
}

#[tokio::test]
async fn test_missing_table_means_no_results() {
    let mut server = mockito::Server::new_async().await;

    let listing = server
        .mock("GET", "/picklist")
        .match_query(listing_query(0, "9999"))
        .with_status(200)
        .with_body("<html><body><p>Your search did not match any documents.</p></body></html>")
        .expect(1)
        .create_async()
        .await;

    let catalog = catalog_for(&server);
    let rows = collect_matching(&catalog, "9999").await.unwrap();

    assert!(rows.is_empty());
    assert_eq!(summarize(&rows), None);

    listing.assert_async().await;
}

#[tokio::test]
async fn test_non_200_response_is_fatal() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/picklist")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let catalog = catalog_for(&server);
    let result = collect_matching(&catalog, "1040").await;

    match result {
        Err(CatalogError::HttpStatus(status)) => assert_eq!(status.as_u16(), 503),
        other => panic!("expected HttpStatus error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_documents_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let data_root = tempfile::tempdir().unwrap();

    let doc_2019_url = format!("{}/pub/irs-prior/f1099--2019.pdf", server.url());
    let doc_2020_url = format!("{}/pub/irs-prior/f1099--2020.pdf", server.url());

    server
        .mock("GET", "/picklist")
        .match_query(listing_query(0, "1099"))
        .with_status(200)
        .with_body(page_html(&[
            ("1099", "Miscellaneous Income", "2019", Some(doc_2019_url.as_str())),
            ("1099", "Miscellaneous Income", "2020", Some(doc_2020_url.as_str())),
        ]))
        .expect(1)
        .create_async()
        .await;

    let doc_2019 = server
        .mock("GET", "/pub/irs-prior/f1099--2019.pdf")
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_body("%PDF-1.4 fake 2019")
        .expect(1)
        .create_async()
        .await;

    let doc_2020 = server
        .mock("GET", "/pub/irs-prior/f1099--2020.pdf")
        .with_status(200)
        .with_body("%PDF-1.4 fake 2020")
        .expect(0)
        .create_async()
        .await;

    let catalog = catalog_for(&server);
    let outcome = fetch_documents(&catalog, "1099", 2019, 2019, data_root.path())
        .await
        .unwrap();

    assert_eq!(outcome.files_written, 1);
    assert_eq!(outcome.target_dir, data_root.path().join("1099"));

    let written = std::fs::read(data_root.path().join("1099").join("2019.pdf")).unwrap();
    assert_eq!(written, b"%PDF-1.4 fake 2019");

    // The out-of-range 2020 document was never requested
    doc_2019.assert_async().await;
    doc_2020.assert_async().await;
}

#[tokio::test]
async fn test_fetch_documents_nothing_in_range() {
    let mut server = mockito::Server::new_async().await;
    let data_root = tempfile::tempdir().unwrap();

    server
        .mock("GET", "/picklist")
        .match_query(listing_query(0, "1099"))
        .with_status(200)
        .with_body(page_html(&[(
            "1099",
            "Miscellaneous Income",
            "2015",
            Some("/pub/f1099--2015.pdf"),
        )]))
        .create_async()
        .await;

    let catalog = catalog_for(&server);
    let outcome = fetch_documents(&catalog, "1099", 2019, 2020, data_root.path())
        .await
        .unwrap();

    assert_eq!(outcome.files_written, 0);
    assert!(!data_root.path().join("1099").exists());
}
