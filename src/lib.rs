//! Sitemaps - sitemaps.org documents for a routed web application.
//!
//! Nodes come from two places: endpoints discovered through the route table
//! (scanned once per sitemap, then cached) and nodes the application sets at
//! runtime. [`SitemapService`] merges both, pages them and renders either a
//! `urlset` or a `sitemapindex`.

pub mod logger;

pub mod cache;
pub mod cli;
pub mod config;
pub mod endpoint;
pub mod etag;
pub mod generator;
pub mod node;
pub mod pager;
pub mod serve;
pub mod service;
pub mod uri;

pub use config::{ConfigError, SiteConfig, SitemapRoute};
pub use endpoint::{EndpointDiscovery, EndpointHint, RouteManifest, RouteMatcher, UrlResolver};
pub use generator::{DocumentKind, RenderOptions, SitemapDocument};
pub use node::{ChangeFrequency, Priority, SitemapNode, Timestamp};
pub use pager::Page;
pub use service::{DEFAULT_SITEMAP, SitemapService};
