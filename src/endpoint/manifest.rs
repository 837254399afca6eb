//! Declarative route table loaded from `[[group]]` and `[[route]]`.

use anyhow::Result;
use percent_encoding::percent_decode_str;
use url::Url;

use super::{EndpointDiscovery, EndpointHint, RouteMatcher, UrlResolver};
use crate::config::{ConfigError, SiteConfig, SitemapHint};

/// One segment of a route path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `{name}`: matches any single segment.
    Param,
}

#[derive(Debug, Clone)]
struct ManifestRoute {
    endpoint_id: String,
    path: String,
    segments: Vec<Segment>,
    accepts_get: bool,
    hint: Option<SitemapHint>,
}

impl ManifestRoute {
    fn new(endpoint_id: &str, path: &str, methods: &[String], hint: Option<&SitemapHint>) -> Self {
        Self {
            endpoint_id: endpoint_id.to_owned(),
            path: path.to_owned(),
            segments: parse_pattern(path),
            accepts_get: methods.iter().any(|m| m.eq_ignore_ascii_case("GET")),
            hint: hint.cloned(),
        }
    }

    fn has_params(&self) -> bool {
        self.segments.contains(&Segment::Param)
    }

    fn matches(&self, segments: &[String]) -> bool {
        self.segments.len() == segments.len()
            && self.segments.iter().zip(segments).all(|(pattern, seg)| match pattern {
                Segment::Literal(lit) => lit == seg,
                Segment::Param => true,
            })
    }
}

fn parse_pattern(path: &str) -> Vec<Segment> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with('{') && s.ends_with('}') {
                Segment::Param
            } else {
                Segment::Literal(s.to_owned())
            }
        })
        .collect()
}

/// Route table implementing discovery, URL resolution and GET matching.
#[derive(Debug, Clone)]
pub struct RouteManifest {
    /// Site origin, path always ending in `/`.
    base: Url,
    routes: Vec<ManifestRoute>,
}

impl RouteManifest {
    /// Empty manifest rooted at `base`.
    pub fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            base,
            routes: Vec::new(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        let mut manifest = Self::new(config.site_url()?);
        for (route, hint) in config.routes() {
            manifest.push(route.endpoint_id(), &route.path, &route.methods, hint);
        }
        Ok(manifest)
    }

    /// Add a route. A `hint` marks it for inclusion in a sitemap.
    pub fn with_route(
        mut self,
        endpoint_id: &str,
        path: &str,
        methods: &[&str],
        hint: Option<SitemapHint>,
    ) -> Self {
        let methods: Vec<String> = methods.iter().map(|m| (*m).to_owned()).collect();
        self.push(endpoint_id, path, &methods, hint.as_ref());
        self
    }

    fn push(&mut self, endpoint_id: &str, path: &str, methods: &[String], hint: Option<&SitemapHint>) {
        self.routes
            .push(ManifestRoute::new(endpoint_id, path, methods, hint));
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Decoded path segments of `url` below the site base, or `None` when
    /// `url` lives on another origin or outside the base path.
    fn local_segments(&self, url: &Url) -> Option<Vec<String>> {
        if url.origin() != self.base.origin() {
            return None;
        }
        let rest = url.path().strip_prefix(self.base.path()).or_else(|| {
            // `https://example.com/app` against base path `/app/`
            (format!("{}/", url.path()) == self.base.path()).then_some("")
        })?;
        Some(
            rest.split('/')
                .filter(|s| !s.is_empty())
                .map(|s| {
                    percent_decode_str(s)
                        .decode_utf8()
                        .map(|d| d.into_owned())
                        .unwrap_or_else(|_| s.to_owned())
                })
                .collect(),
        )
    }
}

impl EndpointDiscovery for RouteManifest {
    fn discover(&self) -> Result<Vec<EndpointHint>> {
        Ok(self
            .routes
            .iter()
            .filter_map(|route| {
                let hint = route.hint.as_ref()?;
                Some(EndpointHint {
                    endpoint_id: route.endpoint_id.clone(),
                    sitemap: hint.name.clone(),
                    frequency: hint.changefreq,
                    priority: hint.priority,
                    last_modified: hint.lastmod,
                })
            })
            .collect())
    }
}

impl UrlResolver for RouteManifest {
    fn resolve(&self, endpoint_id: &str) -> Result<Option<String>> {
        let Some(route) = self.routes.iter().find(|r| r.endpoint_id == endpoint_id) else {
            return Ok(None);
        };
        if route.has_params() {
            return Ok(None);
        }
        let relative = route.path.trim_start_matches('/');
        Ok(self.base.join(relative).ok().map(String::from))
    }
}

impl RouteMatcher for RouteManifest {
    fn supports_get(&self, url: &str) -> bool {
        let Ok(url) = Url::parse(url) else {
            return false;
        };
        let Some(segments) = self.local_segments(&url) else {
            return false;
        };
        self.routes
            .iter()
            .any(|route| route.accepts_get && route.matches(&segments))
    }
}
