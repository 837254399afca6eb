use anyhow::bail;
use chrono::DateTime;

use super::*;
use crate::config::SitemapHint;
use crate::endpoint::{EndpointDiscovery, EndpointHint, RouteMatcher, UrlResolver};
use crate::generator::DocumentKind;
use crate::node::{ChangeFrequency, Priority};

fn site() -> Url {
    Url::parse("https://example.com").unwrap()
}

fn service(manifest: RouteManifest) -> SitemapService {
    SitemapService::new(site(), Arc::new(manifest), RenderOptions::default())
}

fn empty() -> SitemapService {
    service(RouteManifest::new(site()))
}

fn node(url: &str) -> SitemapNode {
    SitemapNode::new(url).with_last_modified(
        DateTime::parse_from_rfc3339("2024-03-01T12:00:00+00:00").unwrap(),
    )
}

fn urls(nodes: &[SitemapNode]) -> Vec<&str> {
    nodes.iter().map(SitemapNode::url).collect()
}

/// Route table whose discovery always fails.
struct BrokenRoutes;

impl EndpointDiscovery for BrokenRoutes {
    fn discover(&self) -> Result<Vec<EndpointHint>> {
        bail!("connection refused")
    }
}

impl UrlResolver for BrokenRoutes {
    fn resolve(&self, _: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

impl RouteMatcher for BrokenRoutes {
    fn supports_get(&self, _: &str) -> bool {
        false
    }
}

// ============================================================================
// nodes
// ============================================================================

#[test]
fn test_add_nodes_replaces() {
    let service = empty();
    service.add_nodes("news", [node("https://example.com/a"), node("https://example.com/b")]);
    service.add_nodes("news", [node("https://example.com/c")]);

    assert_eq!(urls(&service.dynamic_nodes("news")), ["https://example.com/c"]);
}

#[test]
fn test_add_default_nodes() {
    let service = empty();
    service.add_default_nodes([node("https://example.com/promo")]);
    assert_eq!(service.dynamic_nodes(DEFAULT_SITEMAP).len(), 1);
    assert!(service.dynamic_nodes("other").is_empty());
}

#[test]
fn test_static_nodes_come_first() {
    let manifest = RouteManifest::new(site())
        .with_route("home", "/", &["GET"], Some(SitemapHint::default()))
        .with_route("about", "/about", &["GET"], Some(SitemapHint::default()));
    let service = service(manifest);
    service.add_default_nodes([node("https://example.com/promo")]);

    let page = service.nodes(DEFAULT_SITEMAP, None, None).unwrap();
    assert_eq!(
        urls(page.items()),
        [
            "https://example.com/",
            "https://example.com/about",
            "https://example.com/promo"
        ]
    );
    assert_eq!(page.total_count(), 3);
}

#[test]
fn test_nodes_paging() {
    let service = empty();
    service.add_nodes(
        "x",
        (0..7).map(|i| node(&format!("https://example.com/{i}"))),
    );

    let page = service.nodes("x", Some(2), Some(3)).unwrap();
    assert_eq!(
        urls(page.items()),
        [
            "https://example.com/3",
            "https://example.com/4",
            "https://example.com/5"
        ]
    );
    assert_eq!(page.total_count(), 7);
}

#[test]
fn test_discovery_failure_propagates() {
    let service = SitemapService::new(site(), Arc::new(BrokenRoutes), RenderOptions::default());
    service.add_default_nodes([node("https://example.com/promo")]);

    let err = service.xml(DEFAULT_SITEMAP, None, None).unwrap_err();
    assert!(format!("{err:#}").contains("connection refused"));
    assert!(service.nodes(DEFAULT_SITEMAP, None, None).is_err());
}

// ============================================================================
// rendering
// ============================================================================

#[test]
fn test_unknown_name_renders_empty_urlset() {
    let xml = empty().xml("X", None, None).unwrap();
    assert!(xml.contains("<urlset"));
    assert!(!xml.contains("<url>"));
}

#[test]
fn test_overflow_renders_index() {
    let service = empty();
    service.register(SitemapRoute::default()).unwrap();
    service.add_default_nodes((0..130).map(|i| node(&format!("https://example.com/p/{i}"))));

    let doc = service.document(DEFAULT_SITEMAP, None, None).unwrap();
    assert_eq!(doc.kind, DocumentKind::Index);
    assert_eq!(doc.content.matches("<sitemap>").count(), 2);
    assert!(
        doc.content
            .contains("<loc>https://example.com/sitemap.xml?page=2</loc>")
    );

    let second = service.document(DEFAULT_SITEMAP, Some(2), None).unwrap();
    assert_eq!(second.kind, DocumentKind::UrlSet);
    assert_eq!(second.content.matches("<url>").count(), 5);
}

#[test]
fn test_index_links_use_registered_path() {
    let service = empty();
    service
        .register(SitemapRoute::new("news", "/news-sitemap.xml"))
        .unwrap();
    service.add_nodes("news", (0..3).map(|i| node(&format!("https://example.com/n/{i}"))));

    let xml = service.xml("news", None, Some(2)).unwrap();
    assert!(xml.contains("<sitemapindex"));
    assert!(xml.contains("https://example.com/news-sitemap.xml?count=2&amp;page=2"));
}

#[test]
fn test_metadata_rendered() {
    let service = empty();
    service.add_default_nodes([node("https://example.com/a")
        .with_frequency(ChangeFrequency::Weekly)
        .with_priority(Priority::new(0.8).unwrap())]);

    let xml = service.xml(DEFAULT_SITEMAP, None, None).unwrap();
    assert!(xml.contains("<lastmod>2024-03-01T12:00+00:00</lastmod>"));
    assert!(xml.contains("<changefreq>weekly</changefreq>"));
    assert!(xml.contains("<priority>0.8</priority>"));
}

#[test]
fn test_document_etag_tracks_content() {
    let service = empty();
    service.add_default_nodes([node("https://example.com/a")]);
    let first = service.document(DEFAULT_SITEMAP, None, None).unwrap();
    let again = service.document(DEFAULT_SITEMAP, None, None).unwrap();
    assert_eq!(first.etag(), again.etag());

    service.add_default_nodes([node("https://example.com/b")]);
    let changed = service.document(DEFAULT_SITEMAP, None, None).unwrap();
    assert_ne!(first.etag(), changed.etag());
}

// ============================================================================
// registration
// ============================================================================

#[test]
fn test_register_and_lookup() {
    let service = empty();
    service.register(SitemapRoute::default()).unwrap();
    service
        .register(SitemapRoute::new("news", "/news.xml"))
        .unwrap();

    assert_eq!(service.routes().len(), 2);
    assert_eq!(
        service.route_for_path("/news.xml").map(|r| r.name),
        Some("news".to_owned())
    );
    assert!(service.route_for_path("/missing.xml").is_none());
}

#[test]
fn test_register_rejects_taken_path() {
    let service = empty();
    service.register(SitemapRoute::new("a", "/s.xml")).unwrap();
    assert!(service.register(SitemapRoute::new("b", "/s.xml")).is_err());
    assert!(service.register(SitemapRoute::new("c", "relative.xml")).is_err());
}

#[test]
fn test_register_again_moves_name() {
    let service = empty();
    service.register(SitemapRoute::new("a", "/old.xml")).unwrap();
    service.register(SitemapRoute::new("a", "/new.xml")).unwrap();

    assert_eq!(service.routes().len(), 1);
    assert!(service.route_for_path("/old.xml").is_none());
    assert_eq!(service.sitemap_url("a").as_str(), "https://example.com/new.xml");
}

#[test]
fn test_sitemap_url_fallback() {
    assert_eq!(
        empty().sitemap_url("news").as_str(),
        "https://example.com/news.xml"
    );
}

#[test]
fn test_sitemap_url_keeps_site_prefix() {
    let site = Url::parse("https://example.com/app/").unwrap();
    let service = SitemapService::new(
        site.clone(),
        Arc::new(RouteManifest::new(site)),
        RenderOptions::default(),
    );
    service.register(SitemapRoute::default()).unwrap();
    assert_eq!(
        service.sitemap_url(DEFAULT_SITEMAP).as_str(),
        "https://example.com/app/sitemap.xml"
    );
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_from_config() {
    let config = SiteConfig::from_str(
        r#"
        [site]
        url = "https://example.com"

        [sitemap]
        page_size = 50

        [[sitemap.route]]
        name = "default"
        path = "/sitemap.xml"

        [[sitemap.route]]
        name = "news"
        path = "/news.xml"

        [[group]]
        name = "blog"
        sitemap = { changefreq = "daily", priority = 0.7 }

        [[group.route]]
        id = "blog.index"
        path = "/blog"

        [[group.route]]
        id = "blog.post"
        path = "/blog/{slug}"

        [[route]]
        id = "home"
        path = "/"
        sitemap = { changefreq = "weekly", priority = 1.0 }

        [[route]]
        id = "login"
        path = "/login"
        methods = ["POST"]
        sitemap = {}

        [[node]]
        url = "https://example.com/promo"

        [[node]]
        sitemap = "news"
        url = "https://example.com/news/1"

        [[node]]
        url = "https://example.com/sale"
        "#,
    )
    .unwrap();

    let service = SitemapService::from_config(&config).unwrap();
    assert_eq!(service.page_size(), 50);
    assert_eq!(service.routes().len(), 2);

    let page = service.nodes(DEFAULT_SITEMAP, None, None).unwrap();
    assert_eq!(
        urls(page.items()),
        [
            "https://example.com/blog",
            "https://example.com/",
            "https://example.com/promo",
            "https://example.com/sale"
        ]
    );
    assert_eq!(page.items()[0].frequency(), ChangeFrequency::Daily);
    assert_eq!(urls(&service.dynamic_nodes("news")), ["https://example.com/news/1"]);
}
