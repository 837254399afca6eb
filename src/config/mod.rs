//! Configuration management for `sitemaps.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── routes     # [[group]], [[route]], [[node]]
//! │   ├── serve      # [serve]
//! │   ├── site       # [site]
//! │   └── sitemap    # [sitemap], [[sitemap.route]]
//! ├── error          # ConfigError
//! └── mod.rs         # SiteConfig (this file)
//! ```

mod error;
pub mod section;

pub use error::ConfigError;
pub use section::{
    DEFAULT_PAGE_SIZE, GroupConfig, NodeConfig, RouteConfig, ServeConfig, SiteSectionConfig,
    SitemapHint, SitemapRoute, SitemapSectionConfig,
};

use crate::log;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use url::Url;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing sitemaps.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Public origin of the application
    #[serde(default)]
    pub site: SiteSectionConfig,

    /// Paging, output format and sitemap routes
    #[serde(default)]
    pub sitemap: SitemapSectionConfig,

    /// HTTP listener settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Handler groups
    #[serde(default)]
    pub group: Vec<GroupConfig>,

    /// Ungrouped routes
    #[serde(default)]
    pub route: Vec<RouteConfig>,

    /// Nodes registered at startup
    #[serde(default)]
    pub node: Vec<NodeConfig>,
}

impl SiteConfig {
    /// Load and validate configuration from a file.
    ///
    /// Unknown fields are reported as warnings and otherwise ignored.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.config_path = path.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Parsed `site.url`. Only valid after [`SiteConfig::validate`].
    pub fn site_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.site.url)
            .map_err(|e| ConfigError::invalid(format!("site.url `{}`: {e}", self.site.url)))?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(ConfigError::invalid(format!(
                "site.url `{}` must be an absolute http(s) URL",
                self.site.url
            )));
        }
        Ok(url)
    }

    /// Iterate every route with the group-level hint it inherits.
    pub fn routes(&self) -> impl Iterator<Item = (&RouteConfig, Option<&SitemapHint>)> {
        let grouped = self.group.iter().flat_map(|group| {
            group
                .route
                .iter()
                .map(move |route| (route, group.sitemap.as_ref().or(route.sitemap.as_ref())))
        });
        let ungrouped = self.route.iter().map(|route| (route, route.sitemap.as_ref()));
        grouped.chain(ungrouped)
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.site_url()?;

        if self.sitemap.page_size == 0 {
            return Err(ConfigError::invalid("sitemap.page_size must be greater than 0"));
        }

        let mut names = FxHashSet::default();
        for route in &self.sitemap.route {
            if !route.path.starts_with('/') {
                return Err(ConfigError::invalid(format!(
                    "sitemap route `{}`: path `{}` must start with `/`",
                    route.name, route.path
                )));
            }
            if !names.insert(route.name.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "sitemap route `{}` is declared twice",
                    route.name
                )));
            }
        }

        let mut ids = FxHashSet::default();
        for (route, _) in self.routes() {
            if !route.path.starts_with('/') {
                return Err(ConfigError::invalid(format!(
                    "route `{}`: path `{}` must start with `/`",
                    route.id, route.path
                )));
            }
            if !ids.insert(route.endpoint_id()) {
                return Err(ConfigError::invalid(format!(
                    "route `{}` is declared twice",
                    route.endpoint_id()
                )));
            }
        }

        Ok(())
    }
}

/// Locate `config_name`, walking up from the current directory.
///
/// Absolute paths are returned as-is when they exist.
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ChangeFrequency;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
        [site]
        url = "https://example.com"

        [sitemap]
        page_size = 2

        [[sitemap.route]]
        name = "default"
        path = "/sitemap.xml"

        [[group]]
        name = "blog"
        sitemap = { changefreq = "daily", priority = 0.7 }

        [[group.route]]
        id = "blog.index"
        path = "/blog"

        [[route]]
        id = "home"
        path = "/"
        sitemap = { changefreq = "weekly", priority = 1.0 }

        [[route]]
        id = "login"
        path = "/login"
        methods = ["POST"]

        [[node]]
        url = "https://example.com/promo"
    "#;

    #[test]
    fn test_parse_sample() {
        let config = SiteConfig::from_str(SAMPLE).unwrap();
        assert_eq!(config.sitemap.page_size, 2);
        assert_eq!(config.group.len(), 1);
        assert_eq!(config.route.len(), 2);
        assert_eq!(config.node.len(), 1);
        assert_eq!(config.site_url().unwrap().as_str(), "https://example.com/");
    }

    #[test]
    fn test_group_hint_is_inherited() {
        let config = SiteConfig::from_str(SAMPLE).unwrap();
        let routes: Vec<_> = config.routes().collect();

        let (blog, hint) = routes[0];
        assert_eq!(blog.id, "blog.index");
        assert_eq!(hint.unwrap().changefreq, ChangeFrequency::Daily);

        let (login, hint) = routes[2];
        assert_eq!(login.id, "login");
        assert!(hint.is_none());
    }

    #[test]
    fn test_defaults_when_empty() {
        let config = SiteConfig::from_str("").unwrap();
        assert_eq!(config.sitemap.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.sitemap.route.len(), 1);
        assert!(config.route.is_empty());
    }

    #[test]
    fn test_rejects_relative_site_url() {
        let err = SiteConfig::from_str("[site]\nurl = \"/relative\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_non_http_site_url() {
        let err = SiteConfig::from_str("[site]\nurl = \"ftp://example.com\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let err = SiteConfig::from_str("[sitemap]\npage_size = 0").unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_rejects_duplicate_route_ids() {
        let content = r#"
            [[route]]
            id = "a"
            path = "/a"

            [[route]]
            id = "b"
            action = "a"
            path = "/b"
        "#;
        let err = SiteConfig::from_str(content).unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn test_rejects_route_path_without_slash() {
        let content = r#"
            [[route]]
            id = "a"
            path = "a"
        "#;
        assert!(SiteConfig::from_str(content).is_err());
    }

    #[test]
    fn test_rejects_duplicate_sitemap_names() {
        let content = r#"
            [[sitemap.route]]
            name = "default"
            path = "/a.xml"

            [[sitemap.route]]
            name = "default"
            path = "/b.xml"
        "#;
        assert!(SiteConfig::from_str(content).is_err());
    }

    #[test]
    fn test_toml_error() {
        let err = SiteConfig::from_str("[site\nurl = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_load_from_file_ignores_unknown_fields() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{SAMPLE}\n[extra]\nkey = 1").unwrap();

        let config = SiteConfig::load(file.path()).unwrap();
        assert_eq!(config.config_path, file.path());
        assert_eq!(config.route.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SiteConfig::load(Path::new("/nonexistent/sitemaps.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn test_find_absolute_config() {
        let file = NamedTempFile::new().unwrap();
        assert_eq!(find_config_file(file.path()), Some(file.path().to_path_buf()));
        assert_eq!(find_config_file(Path::new("/definitely/not/here.toml")), None);
    }
}
