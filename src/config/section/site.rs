//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://example.com"
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Absolute origin every route and sitemap URL is resolved against.
    /// A path component acts as a prefix (`https://example.com/app`).
    pub url: String,
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5280".into(),
        }
    }
}
