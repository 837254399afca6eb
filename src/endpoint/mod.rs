//! Endpoint discovery seams.
//!
//! The sitemap engine never inspects handlers itself. It consumes three
//! narrow interfaces, usually implemented together by one route table:
//!
//! | Trait               | Question it answers                              |
//! |---------------------|--------------------------------------------------|
//! | [`EndpointDiscovery`] | Which endpoints are marked for the sitemap?    |
//! | [`UrlResolver`]       | What absolute URL does an endpoint live at?    |
//! | [`RouteMatcher`]      | Does that URL reach a handler accepting GET?   |
//!
//! [`RouteManifest`] is the declarative implementation built from config.

mod manifest;

pub use manifest::RouteManifest;

use anyhow::Result;

use crate::node::{ChangeFrequency, Priority, Timestamp};
use crate::service::DEFAULT_SITEMAP;

/// One endpoint carrying an "include in sitemap" marker.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointHint {
    /// Identifier understood by [`UrlResolver::resolve`].
    pub endpoint_id: String,
    /// Target sitemap; `None` means the default sitemap.
    pub sitemap: Option<String>,
    pub frequency: ChangeFrequency,
    pub priority: Priority,
    /// Explicit last modification, if the marker declared one.
    pub last_modified: Option<Timestamp>,
}

impl EndpointHint {
    pub fn new(endpoint_id: impl Into<String>) -> Self {
        Self {
            endpoint_id: endpoint_id.into(),
            sitemap: None,
            frequency: ChangeFrequency::default(),
            priority: Priority::default(),
            last_modified: None,
        }
    }

    /// Name of the sitemap this endpoint belongs to.
    #[inline]
    pub fn sitemap_name(&self) -> &str {
        self.sitemap.as_deref().unwrap_or(DEFAULT_SITEMAP)
    }
}

/// Enumerates endpoints marked for inclusion.
pub trait EndpointDiscovery: Send + Sync {
    fn discover(&self) -> Result<Vec<EndpointHint>>;
}

/// Maps an endpoint identifier to an absolute URL.
pub trait UrlResolver: Send + Sync {
    /// `Ok(None)` when the endpoint has no generatable URL.
    fn resolve(&self, endpoint_id: &str) -> Result<Option<String>>;
}

/// Checks whether an absolute URL routes to a GET-capable handler.
pub trait RouteMatcher: Send + Sync {
    fn supports_get(&self, url: &str) -> bool;
}

/// Everything the static node cache needs from the host's routing layer.
pub trait RouteTable: EndpointDiscovery + UrlResolver + RouteMatcher {}

impl<T: EndpointDiscovery + UrlResolver + RouteMatcher> RouteTable for T {}
