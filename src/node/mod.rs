//! Sitemap URL entries.
//!
//! A [`SitemapNode`] is one `<url>` of a urlset: an absolute location plus
//! the optional metadata search engines read alongside it.

mod frequency;
mod priority;

pub use frequency::ChangeFrequency;
pub use priority::Priority;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp type used for `<lastmod>`. Keeps the original UTC offset.
pub type Timestamp = DateTime<FixedOffset>;

/// Current time as a [`Timestamp`] in UTC.
#[inline]
pub fn now() -> Timestamp {
    Utc::now().fixed_offset()
}

/// Format a timestamp the way `<lastmod>` carries it: minute precision with
/// the UTC offset (`2024-06-15T14:30+02:00`).
pub fn format_lastmod(ts: &Timestamp) -> String {
    ts.format("%Y-%m-%dT%H:%M%:z").to_string()
}

/// One URL entry of a sitemap.
///
/// Immutable value: construct with [`SitemapNode::new`] and the `with_*`
/// builders, then share by clone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapNode {
    url: String,
    #[serde(rename = "lastmod")]
    last_modified: Timestamp,
    #[serde(rename = "changefreq")]
    frequency: ChangeFrequency,
    priority: Priority,
}

impl SitemapNode {
    /// Node for `url`, last modified now, `always` changing, priority 0.5.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            last_modified: now(),
            frequency: ChangeFrequency::default(),
            priority: Priority::default(),
        }
    }

    pub fn with_last_modified(mut self, last_modified: Timestamp) -> Self {
        self.last_modified = last_modified;
        self
    }

    pub fn with_frequency(mut self, frequency: ChangeFrequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[inline]
    pub const fn last_modified(&self) -> &Timestamp {
        &self.last_modified
    }

    #[inline]
    pub const fn frequency(&self) -> ChangeFrequency {
        self.frequency
    }

    #[inline]
    pub const fn priority(&self) -> Priority {
        self.priority
    }
}
