//! `[sitemap]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [sitemap]
//! page_size = 125             # URLs per page before an index is emitted
//! minify = false              # Single-line XML output
//!
//! [[sitemap.route]]
//! name = "default"
//! path = "/sitemap.xml"
//!
//! [[sitemap.route]]
//! name = "news"
//! path = "/news/sitemap.xml"
//! ```

use serde::{Deserialize, Serialize};

use crate::service::DEFAULT_SITEMAP;

/// URLs per sitemap page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 125;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapSectionConfig {
    /// Maximum number of `<url>` entries per page.
    pub page_size: usize,
    /// Emit XML without indentation.
    pub minify: bool,
    /// Named sitemaps and the URL path each one is served under.
    pub route: Vec<SitemapRoute>,
}

impl Default for SitemapSectionConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            minify: false,
            route: vec![SitemapRoute::default()],
        }
    }
}

/// Registration of one named sitemap under a URL path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapRoute {
    pub name: String,
    pub path: String,
}

impl SitemapRoute {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl Default for SitemapRoute {
    fn default() -> Self {
        Self::new(DEFAULT_SITEMAP, "/sitemap.xml")
    }
}
