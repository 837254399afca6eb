//! Document generators.
//!
//! - **Sitemap**: urlset and sitemap index documents (`sitemap.xml`)

pub mod sitemap;

pub use sitemap::{DocumentKind, RenderOptions, Renderer, SITEMAP_NS, SitemapDocument};
