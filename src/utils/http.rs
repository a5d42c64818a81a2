//! HTTP client construction.
//!
//! The picklist endpoint rejects or degrades requests that do not carry
//! a standard browser header set, so every request goes out with the
//! profile from [`HttpConfig`] as default headers.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;

use crate::config::HttpConfig;

/// Errors raised while assembling the client from configuration
#[derive(Debug, thiserror::Error)]
pub enum HttpSetupError {
    /// A configured header name or value is not valid HTTP
    #[error("invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// The underlying client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Build a client with the configured browser header profile
///
/// Accept-Encoding is left to reqwest so gzip/brotli/deflate responses
/// are decoded transparently.
pub fn build_client(config: &HttpConfig) -> Result<Client, HttpSetupError> {
    let mut headers = HeaderMap::new();

    insert(&mut headers, "accept", &config.accept)?;
    insert(&mut headers, "accept-language", &config.accept_language)?;
    insert(&mut headers, "cache-control", "max-age=0")?;
    insert(&mut headers, "sec-fetch-dest", "document")?;
    insert(&mut headers, "sec-fetch-mode", "navigate")?;
    insert(&mut headers, "sec-fetch-site", "none")?;
    insert(&mut headers, "sec-fetch-user", "?1")?;
    insert(&mut headers, "upgrade-insecure-requests", "1")?;

    if let Some(cookie) = &config.cookie {
        insert(&mut headers, "cookie", cookie)?;
    }

    // Extra headers win over the profile above
    for (name, value) in &config.headers {
        insert(&mut headers, name, value)?;
    }

    let client = Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    Ok(client)
}

fn insert(headers: &mut HeaderMap, name: &str, value: &str) -> Result<(), HttpSetupError> {
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        HttpSetupError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        }
    })?;
    let header_value =
        HeaderValue::from_str(value).map_err(|e| HttpSetupError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
    headers.insert(header_name, header_value);
    Ok(())
}
