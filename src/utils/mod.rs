//! Utility modules supporting catalog operations.
//!
//! - [`canonical`] / [`equal`]: form-number canonicalization and
//!   comparison
//! - [`build_client`]: HTTP client construction with the configured
//!   browser header profile

mod http;
mod normalize;

pub use http::build_client;
pub use normalize::{canonical, equal};
