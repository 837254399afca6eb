//! HTTP boundary: serves every registered sitemap route.
//!
//! ```text
//! GET|HEAD /sitemap.xml?page=2&count=50
//!   ├─ unknown path ──────────────► 404
//!   ├─ bad page / count ──────────► 400
//!   ├─ If-None-Match == ETag ─────► 304
//!   └─ render ────────────────────► 200 | 500
//! ```

mod lifecycle;
mod response;

pub use lifecycle::{is_shutdown, setup_shutdown_handler};

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tiny_http::{Method, Request, Server};

use crate::config::ServeConfig;
use crate::generator::SitemapDocument;
use crate::service::SitemapService;
use crate::{debug, log};

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    workers: usize,
}

/// Bind the HTTP server without starting the request loop.
pub fn bind_server(config: &ServeConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.interface, config.port)?;
    let server = Arc::new(server);
    lifecycle::register_server(Arc::clone(&server));

    log!("serve"; "http://{}", addr);

    Ok(BoundServer {
        server,
        addr,
        workers: config.workers.max(1),
    })
}

impl BoundServer {
    /// Start the request loop (blocking) until the server is unblocked.
    pub fn run(self, service: Arc<SitemapService>) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .context("failed to create request thread pool")?;

        for route in service.routes() {
            debug!("serve"; "http://{}{} -> `{}`", self.addr, route.path, route.name);
        }

        for request in self.server.incoming_requests() {
            let service = Arc::clone(&service);
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &service) {
                    log!("serve"; "request error: {e}");
                }
            });
        }
        Ok(())
    }
}

/// Bind and serve until Ctrl+C.
pub fn serve(service: Arc<SitemapService>, config: &ServeConfig) -> Result<()> {
    bind_server(config)?.run(service)
}

// ============================================================================
// request handling
// ============================================================================

/// What to answer one request with.
#[derive(Debug)]
pub enum Reply {
    Document { document: SitemapDocument, etag: String },
    NotModified { document: SitemapDocument, etag: String },
    NotFound,
    BadRequest(String),
    MethodNotAllowed,
    Unavailable,
    Failed(anyhow::Error),
}

impl Reply {
    pub fn status(&self) -> u16 {
        match self {
            Self::Document { .. } => 200,
            Self::NotModified { .. } => 304,
            Self::BadRequest(_) => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::Failed(_) => 500,
            Self::Unavailable => 503,
        }
    }
}

/// Query parameters of a sitemap request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SitemapQuery {
    pub page: Option<usize>,
    pub count: Option<usize>,
}

impl SitemapQuery {
    /// Parse `page` and `count` from a raw query string. Other keys are
    /// ignored; a repeated key keeps its last value.
    pub fn parse(query: &str) -> Result<Self, String> {
        let mut parsed = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match &*key {
                "page" => &mut parsed.page,
                "count" => &mut parsed.count,
                _ => continue,
            };
            let number = value
                .trim()
                .parse::<usize>()
                .map_err(|_| format!("`{key}` must be a non-negative integer, got `{value}`"))?;
            *slot = Some(number);
        }
        Ok(parsed)
    }
}

/// Decide the reply for `method` on the request target `target`.
pub fn reply_for(
    service: &SitemapService,
    method: &Method,
    target: &str,
    if_none_match: Option<&str>,
) -> Reply {
    if lifecycle::is_shutdown() {
        return Reply::Unavailable;
    }
    if !matches!(method, Method::Get | Method::Head) {
        return Reply::MethodNotAllowed;
    }

    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    let Some(route) = service.route_for_path(path) else {
        return Reply::NotFound;
    };
    let query = match SitemapQuery::parse(query) {
        Ok(query) => query,
        Err(message) => return Reply::BadRequest(message),
    };

    let document = match service.document(&route.name, query.page, query.count) {
        Ok(document) => document,
        Err(e) => return Reply::Failed(e),
    };
    let etag = document.etag();

    if if_none_match.is_some_and(|header| crate::etag::matches_if_none_match(header, &etag)) {
        Reply::NotModified { document, etag }
    } else {
        Reply::Document { document, etag }
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, service: &SitemapService) -> Result<()> {
    let if_none_match = response::header_value(&request, "If-None-Match");
    let reply = reply_for(
        service,
        request.method(),
        request.url(),
        if_none_match.as_deref(),
    );

    debug!("serve"; "{} {} -> {}", request.method(), request.url(), reply.status());
    if let Reply::Failed(e) = &reply {
        log!("error"; "{} {}: {:#}", request.method(), request.url(), e);
    }

    response::send(request, reply)
}

#[cfg(test)]
mod tests;
