use anyhow::bail;
use chrono::DateTime;
use url::Url;

use super::*;
use crate::config::SitemapRoute;
use crate::endpoint::{EndpointDiscovery, EndpointHint, RouteManifest, RouteMatcher, UrlResolver};
use crate::generator::{DocumentKind, RenderOptions};
use crate::node::SitemapNode;
use crate::service::DEFAULT_SITEMAP;

fn service_with(nodes: usize) -> SitemapService {
    let site = Url::parse("https://example.com").unwrap();
    let service = SitemapService::new(
        site.clone(),
        Arc::new(RouteManifest::new(site)),
        RenderOptions::default(),
    );
    service.register(SitemapRoute::default()).unwrap();
    let lastmod = DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap();
    service.add_default_nodes(
        (0..nodes)
            .map(|i| SitemapNode::new(format!("https://example.com/{i}")).with_last_modified(lastmod)),
    );
    service
}

struct BrokenRoutes;

impl EndpointDiscovery for BrokenRoutes {
    fn discover(&self) -> anyhow::Result<Vec<EndpointHint>> {
        bail!("route table unavailable")
    }
}

impl UrlResolver for BrokenRoutes {
    fn resolve(&self, _: &str) -> anyhow::Result<Option<String>> {
        Ok(None)
    }
}

impl RouteMatcher for BrokenRoutes {
    fn supports_get(&self, _: &str) -> bool {
        false
    }
}

// ============================================================================
// query parsing
// ============================================================================

#[test]
fn test_query_empty() {
    assert_eq!(SitemapQuery::parse("").unwrap(), SitemapQuery::default());
}

#[test]
fn test_query_page_and_count() {
    let query = SitemapQuery::parse("page=2&count=50&utm_source=x").unwrap();
    assert_eq!(query.page, Some(2));
    assert_eq!(query.count, Some(50));
}

#[test]
fn test_query_last_value_wins() {
    assert_eq!(SitemapQuery::parse("page=1&page=3").unwrap().page, Some(3));
}

#[test]
fn test_query_rejects_garbage() {
    assert!(SitemapQuery::parse("page=two").is_err());
    assert!(SitemapQuery::parse("count=-1").is_err());
    assert!(SitemapQuery::parse("page=").is_err());
}

// ============================================================================
// replies
// ============================================================================

#[test]
fn test_get_renders_document() {
    let service = service_with(3);
    let reply = reply_for(&service, &Method::Get, "/sitemap.xml", None);
    let Reply::Document { document, etag } = reply else {
        panic!("expected document, got {reply:?}");
    };
    assert_eq!(document.kind, DocumentKind::UrlSet);
    assert_eq!(etag, document.etag());
    assert!(document.last_modified.is_some());
}

#[test]
fn test_head_is_allowed() {
    let service = service_with(1);
    assert_eq!(reply_for(&service, &Method::Head, "/sitemap.xml", None).status(), 200);
}

#[test]
fn test_page_query_selects_urlset() {
    let service = service_with(130);
    let index = reply_for(&service, &Method::Get, "/sitemap.xml", None);
    let page = reply_for(&service, &Method::Get, "/sitemap.xml?page=2", None);

    match (index, page) {
        (Reply::Document { document: index, .. }, Reply::Document { document: page, .. }) => {
            assert_eq!(index.kind, DocumentKind::Index);
            assert_eq!(page.kind, DocumentKind::UrlSet);
            assert_eq!(page.content.matches("<url>").count(), 5);
        }
        other => panic!("unexpected replies: {other:?}"),
    }
}

#[test]
fn test_if_none_match_gives_not_modified() {
    let service = service_with(2);
    let Reply::Document { etag, .. } = reply_for(&service, &Method::Get, "/sitemap.xml", None)
    else {
        panic!("expected document");
    };

    let reply = reply_for(&service, &Method::Get, "/sitemap.xml", Some(&etag));
    assert_eq!(reply.status(), 304);

    let reply = reply_for(&service, &Method::Get, "/sitemap.xml", Some("\"stale\""));
    assert_eq!(reply.status(), 200);
}

#[test]
fn test_unknown_path() {
    let service = service_with(0);
    assert_eq!(reply_for(&service, &Method::Get, "/other.xml", None).status(), 404);
    assert_eq!(reply_for(&service, &Method::Get, "/", None).status(), 404);
}

#[test]
fn test_bad_query() {
    let service = service_with(0);
    let reply = reply_for(&service, &Method::Get, "/sitemap.xml?page=x", None);
    assert!(matches!(reply, Reply::BadRequest(message) if message.contains("page")));
}

#[test]
fn test_method_not_allowed() {
    let service = service_with(0);
    assert_eq!(reply_for(&service, &Method::Post, "/sitemap.xml", None).status(), 405);
    assert_eq!(reply_for(&service, &Method::Delete, "/nowhere", None).status(), 405);
}

#[test]
fn test_render_failure() {
    let site = Url::parse("https://example.com").unwrap();
    let service = SitemapService::new(site, Arc::new(BrokenRoutes), RenderOptions::default());
    service.register(SitemapRoute::default()).unwrap();

    let reply = reply_for(&service, &Method::Get, "/sitemap.xml", None);
    assert_eq!(reply.status(), 500);
    assert!(matches!(reply, Reply::Failed(e) if format!("{e:#}").contains("unavailable")));
}

#[test]
fn test_named_route() {
    let service = service_with(1);
    service.register(SitemapRoute::new("news", "/news.xml")).unwrap();
    service.add_nodes("news", [SitemapNode::new("https://example.com/n/1")]);

    let Reply::Document { document, .. } = reply_for(&service, &Method::Get, "/news.xml", None)
    else {
        panic!("expected document");
    };
    assert!(document.content.contains("https://example.com/n/1"));
    assert!(!document.content.contains("https://example.com/0"));
    assert_eq!(service.dynamic_nodes(DEFAULT_SITEMAP).len(), 1);
}
