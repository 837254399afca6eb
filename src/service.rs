//! Sitemap service: the facade application code and the HTTP layer talk to.
//!
//! Owns the node stores of every named sitemap and wires them through the
//! pager into the renderer.
//!
//! ```text
//! nodes(name)  = Page( static(name) ++ dynamic(name) )
//! xml(name)    = Renderer( static(name) ++ dynamic(name) )
//! ```
//!
//! Construct once at startup and share it behind an `Arc`.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use parking_lot::RwLock;
use url::Url;

use crate::cache::{DynamicNodeRegistry, StaticNodeCache};
use crate::config::{SiteConfig, SitemapRoute};
use crate::endpoint::{RouteManifest, RouteTable};
use crate::generator::{RenderOptions, Renderer, SitemapDocument};
use crate::node::SitemapNode;
use crate::pager::Page;
use crate::{debug, log};

/// Name used when callers do not pick a sitemap.
pub const DEFAULT_SITEMAP: &str = "default";

pub struct SitemapService {
    site: Url,
    routes: Arc<dyn RouteTable>,
    renderer: Renderer,
    static_nodes: StaticNodeCache,
    dynamic_nodes: DynamicNodeRegistry,
    sitemaps: RwLock<Vec<SitemapRoute>>,
}

impl SitemapService {
    /// Service for the site at `site`, discovering endpoints through `routes`.
    pub fn new(site: Url, routes: Arc<dyn RouteTable>, options: RenderOptions) -> Self {
        Self {
            site,
            routes,
            renderer: Renderer::new(options),
            static_nodes: StaticNodeCache::new(),
            dynamic_nodes: DynamicNodeRegistry::new(),
            sitemaps: RwLock::new(Vec::new()),
        }
    }

    /// Build the service described by a config file: route manifest, page
    /// size, sitemap routes and startup nodes.
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        let site = config.site_url()?;
        let manifest = RouteManifest::from_config(config)?;
        debug!("sitemap"; "{} routes in manifest", manifest.len());

        let options = RenderOptions {
            page_size: config.sitemap.page_size,
            minify: config.sitemap.minify,
        };
        let service = Self::new(site, Arc::new(manifest), options);

        for route in &config.sitemap.route {
            service.register(route.clone())?;
        }

        // Group by sitemap, keeping declaration order, so each name is set once
        let mut grouped: Vec<(&str, Vec<SitemapNode>)> = Vec::new();
        for node in &config.node {
            match grouped.iter_mut().find(|(name, _)| *name == node.sitemap) {
                Some((_, nodes)) => nodes.push(node.to_node()),
                None => grouped.push((node.sitemap.as_str(), vec![node.to_node()])),
            }
        }
        for (name, nodes) in grouped {
            service.add_nodes(name, nodes);
        }

        Ok(service)
    }

    // ========================================================================
    // registration
    // ========================================================================

    /// Serve the sitemap `route.name` under `route.path`.
    ///
    /// Registering a name again moves it to the new path. A path can only
    /// belong to one sitemap.
    pub fn register(&self, route: SitemapRoute) -> Result<()> {
        if !route.path.starts_with('/') {
            bail!("sitemap path `{}` must start with `/`", route.path);
        }
        let mut sitemaps = self.sitemaps.write();
        if let Some(taken) = sitemaps
            .iter()
            .find(|r| r.path == route.path && r.name != route.name)
        {
            bail!("path `{}` is already registered for sitemap `{}`", route.path, taken.name);
        }
        sitemaps.retain(|r| r.name != route.name);
        log!("sitemap"; "{} -> {}", route.path, route.name);
        sitemaps.push(route);
        Ok(())
    }

    /// Registered sitemap routes, in registration order.
    pub fn routes(&self) -> Vec<SitemapRoute> {
        self.sitemaps.read().clone()
    }

    /// Sitemap registered under the URL path `path`.
    pub fn route_for_path(&self, path: &str) -> Option<SitemapRoute> {
        self.sitemaps.read().iter().find(|r| r.path == path).cloned()
    }

    /// Absolute URL of sitemap `name`.
    ///
    /// Unregistered names fall back to `/{name}.xml`.
    pub fn sitemap_url(&self, name: &str) -> Url {
        let path = self
            .sitemaps
            .read()
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.path.clone())
            .unwrap_or_else(|| format!("/{name}.xml"));

        let mut url = self.site.clone();
        let prefix = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{prefix}{path}"));
        url
    }

    // ========================================================================
    // nodes
    // ========================================================================

    /// Replace the runtime nodes of sitemap `name`.
    pub fn add_nodes(&self, name: &str, nodes: impl IntoIterator<Item = SitemapNode>) {
        self.dynamic_nodes.set(name, nodes);
        debug!("sitemap"; "`{}`: {} dynamic nodes", name, self.dynamic_nodes.get(name).len());
    }

    /// Replace the runtime nodes of the default sitemap.
    pub fn add_default_nodes(&self, nodes: impl IntoIterator<Item = SitemapNode>) {
        self.add_nodes(DEFAULT_SITEMAP, nodes);
    }

    /// Static nodes (discovered) of sitemap `name`.
    pub fn static_nodes(&self, name: &str) -> Result<Arc<Vec<SitemapNode>>> {
        self.static_nodes.get(name, self.routes.as_ref())
    }

    /// Runtime nodes of sitemap `name`.
    pub fn dynamic_nodes(&self, name: &str) -> Arc<Vec<SitemapNode>> {
        self.dynamic_nodes.get(name)
    }

    /// One page of sitemap `name`: static nodes first, then dynamic ones.
    pub fn nodes(
        &self,
        name: &str,
        page: Option<usize>,
        count: Option<usize>,
    ) -> Result<Page<SitemapNode>> {
        let merged = self.merged(name)?;
        Ok(Page::new(
            &merged,
            page,
            count,
            self.renderer.options().page_size,
        ))
    }

    fn merged(&self, name: &str) -> Result<Vec<SitemapNode>> {
        let static_nodes = self.static_nodes(name)?;
        let dynamic_nodes = self.dynamic_nodes(name);

        let mut merged = Vec::with_capacity(static_nodes.len() + dynamic_nodes.len());
        merged.extend_from_slice(&static_nodes);
        merged.extend_from_slice(&dynamic_nodes);
        Ok(merged)
    }

    // ========================================================================
    // rendering
    // ========================================================================

    /// Rendered document of sitemap `name` with caching metadata.
    pub fn document(
        &self,
        name: &str,
        page: Option<usize>,
        count: Option<usize>,
    ) -> Result<SitemapDocument> {
        let merged = self.merged(name)?;
        let base = self.sitemap_url(name);
        self.renderer
            .render(&merged, &base, page, count)
            .with_context(|| format!("failed to render sitemap `{name}`"))
    }

    /// Rendered XML of sitemap `name`.
    pub fn xml(&self, name: &str, page: Option<usize>, count: Option<usize>) -> Result<String> {
        self.document(name, page, count).map(|doc| doc.content)
    }

    pub fn page_size(&self) -> usize {
        self.renderer.options().page_size
    }
}

#[cfg(test)]
mod tests;
