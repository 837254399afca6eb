//! Configuration section definitions.
//!
//! Each module corresponds to a section in `sitemaps.toml`:
//!
//! | Module    | TOML Section                   | Purpose                            |
//! |-----------|--------------------------------|------------------------------------|
//! | `site`    | `[site]`                       | Public origin of the application   |
//! | `sitemap` | `[sitemap]`, `[[sitemap.route]]` | Paging, output, sitemap routes   |
//! | `serve`   | `[serve]`                      | HTTP listener                      |
//! | `routes`  | `[[group]]`, `[[route]]`, `[[node]]` | Route manifest and extra nodes |

mod routes;
mod serve;
mod site;
mod sitemap;

pub use routes::{GroupConfig, NodeConfig, RouteConfig, SitemapHint};
pub use serve::ServeConfig;
pub use site::SiteSectionConfig;
pub use sitemap::{DEFAULT_PAGE_SIZE, SitemapRoute, SitemapSectionConfig};
