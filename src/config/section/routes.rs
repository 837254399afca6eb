//! Route manifest and runtime node declarations.
//!
//! Routes describe the application's GET handlers. A route (or the group it
//! belongs to) opts into the sitemap by carrying a `sitemap` hint.
//!
//! # Example
//!
//! ```toml
//! [[group]]
//! name = "blog"
//! sitemap = { changefreq = "daily", priority = 0.7 }   # applies to every route below
//!
//! [[group.route]]
//! id = "blog.index"
//! path = "/blog"
//!
//! [[route]]
//! id = "home"
//! path = "/"
//! methods = ["GET", "HEAD"]
//! sitemap = { changefreq = "weekly", priority = 1.0, lastmod = "2024-06-15T10:30:00Z" }
//!
//! [[node]]
//! url = "https://example.com/promo"
//! changefreq = "monthly"
//! ```

use serde::{Deserialize, Serialize};

use crate::node::{ChangeFrequency, Priority, SitemapNode, Timestamp};
use crate::service::DEFAULT_SITEMAP;

/// Handler group. A group-level hint includes every route of the group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    pub name: String,
    pub sitemap: Option<SitemapHint>,
    pub route: Vec<RouteConfig>,
}

/// One route of the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Handler identifier.
    pub id: String,
    /// Path pattern; `{name}` matches a single segment.
    pub path: String,
    /// HTTP methods the handler accepts.
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
    /// Overrides `id` as the endpoint name exposed to discovery.
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub sitemap: Option<SitemapHint>,
}

fn default_methods() -> Vec<String> {
    vec!["GET".into()]
}

impl RouteConfig {
    /// Endpoint name after the `action` override.
    pub fn endpoint_id(&self) -> &str {
        self.action.as_deref().unwrap_or(&self.id)
    }
}

/// Declarative "include in sitemap" marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapHint {
    /// Target sitemap; the default sitemap when absent.
    pub name: Option<String>,
    pub changefreq: ChangeFrequency,
    pub priority: Priority,
    pub lastmod: Option<Timestamp>,
}

/// Node registered at startup as if added at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default = "default_sitemap")]
    pub sitemap: String,
    pub url: String,
    #[serde(default)]
    pub changefreq: ChangeFrequency,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub lastmod: Option<Timestamp>,
}

fn default_sitemap() -> String {
    DEFAULT_SITEMAP.into()
}

impl NodeConfig {
    pub fn to_node(&self) -> SitemapNode {
        let node = SitemapNode::new(self.url.clone())
            .with_frequency(self.changefreq)
            .with_priority(self.priority);
        match self.lastmod {
            Some(lastmod) => node.with_last_modified(lastmod),
            None => node,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_defaults_to_get() {
        let route: RouteConfig = toml::from_str(
            r#"
            id = "about"
            path = "/about"
            "#,
        )
        .unwrap();
        assert_eq!(route.methods, vec!["GET".to_string()]);
        assert!(route.sitemap.is_none());
        assert_eq!(route.endpoint_id(), "about");
    }

    #[test]
    fn test_action_override() {
        let route: RouteConfig = toml::from_str(
            r#"
            id = "AboutPage"
            action = "about"
            path = "/about"
            "#,
        )
        .unwrap();
        assert_eq!(route.endpoint_id(), "about");
    }

    #[test]
    fn test_hint_fields() {
        let hint: SitemapHint = toml::from_str(
            r#"
            name = "news"
            changefreq = "hourly"
            priority = 0.9
            lastmod = "2024-06-15T10:30:00+02:00"
            "#,
        )
        .unwrap();
        assert_eq!(hint.name.as_deref(), Some("news"));
        assert_eq!(hint.changefreq, ChangeFrequency::Hourly);
        assert_eq!(hint.priority.to_string(), "0.9");
        assert!(hint.lastmod.is_some());
    }

    #[test]
    fn test_node_config_to_node() {
        let config: NodeConfig = toml::from_str(
            r#"
            url = "https://example.com/promo"
            changefreq = "monthly"
            priority = 0.4
            "#,
        )
        .unwrap();
        assert_eq!(config.sitemap, "default");

        let node = config.to_node();
        assert_eq!(node.url(), "https://example.com/promo");
        assert_eq!(node.frequency(), ChangeFrequency::Monthly);
        assert_eq!(node.priority().to_string(), "0.4");
    }
}
