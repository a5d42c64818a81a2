//! Configuration management.
//!
//! Settings come from three layers: built-in defaults, an optional TOML
//! configuration file, and `FORMPICK_*` environment variables. The
//! browser header profile sent to the picklist endpoint lives here so
//! deployments can adjust headers or supply a session cookie without a
//! rebuild.
//!
//! ```toml
//! [listing]
//! base_url = "https://apps.irs.gov/app/picklist/list/priorFormPublication.html"
//!
//! [http]
//! user_agent = "Mozilla/5.0 ..."
//! accept_language = "en-US,en;q=0.9"
//! cookie = "JSESSIONID=..."
//! timeout_secs = 30
//!
//! [downloads]
//! data_root = "data"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Listing endpoint settings
    #[serde(default)]
    pub listing: ListingConfig,

    /// HTTP header profile
    #[serde(default)]
    pub http: HttpConfig,

    /// Download settings
    #[serde(default)]
    pub downloads: DownloadConfig,
}

/// Listing endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Base URL of the prior-forms picklist
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://apps.irs.gov/app/picklist/list/priorFormPublication.html".to_string()
}

/// HTTP header profile for listing and document requests
///
/// The picklist endpoint degrades requests that do not look like a
/// browser, so a realistic header set is sent by default. A session
/// cookie is never baked in; supply one via the config file or the
/// `FORMPICK_HTTP_COOKIE` environment variable when required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept header
    #[serde(default = "default_accept")]
    pub accept: String,

    /// Accept-Language header
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Cookie header, when the endpoint requires a session
    #[serde(default)]
    pub cookie: Option<String>,

    /// Additional or overriding headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept: default_accept(),
            accept_language: default_accept_language(),
            cookie: std::env::var("FORMPICK_HTTP_COOKIE").ok(),
            headers: HashMap::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/89.0.4389.90 Safari/537.36"
        .to_string()
}

fn default_accept() -> String {
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,\
     image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9"
        .to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Root directory for downloaded documents; one subdirectory per form
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
        }
    }
}

fn default_data_root() -> PathBuf {
    PathBuf::from("data")
}

/// Load configuration from a file, with `FORMPICK_*` environment overrides
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("FORMPICK").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Find a configuration file in the default locations
///
/// Checks `./formpick.toml`, then `<config-dir>/formpick/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("formpick.toml");
    if local.is_file() {
        return Some(local);
    }

    let user = dirs::config_dir()?.join("formpick").join("config.toml");
    if user.is_file() {
        return Some(user);
    }

    None
}
