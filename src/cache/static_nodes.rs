//! Lazily discovered nodes, keyed by sitemap name.
//!
//! The first reader of a name runs endpoint discovery and publishes the
//! result; every later reader gets the published snapshot without locking.
//!
//! ```text
//! get(name)
//!   ├─ slot.nodes populated? ──────────────► return snapshot (lock-free)
//!   └─ lock slot.populate
//!        ├─ populated meanwhile? ──────────► return snapshot
//!        └─ scan → filter → publish ───────► return snapshot
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use arc_swap::ArcSwapOption;
use dashmap::DashMap;
use parking_lot::Mutex;

use crate::endpoint::{EndpointHint, RouteTable};
use crate::node::{self, SitemapNode, Timestamp};
use crate::{debug, uri};

/// Per-name entry: the published nodes plus the lock serializing population.
#[derive(Default)]
struct Slot {
    nodes: ArcSwapOption<Vec<SitemapNode>>,
    populate: Mutex<()>,
}

/// Cache of nodes derived from discovered endpoints.
///
/// A successful scan is published even when it yields no nodes, so each name
/// is scanned exactly once. A failed scan publishes nothing and the next
/// reader scans again.
#[derive(Default)]
pub struct StaticNodeCache {
    slots: DashMap<String, Arc<Slot>>,
    scans: AtomicUsize,
}

impl StaticNodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes for `name`, populating the entry through `routes` on first use.
    pub fn get(&self, name: &str, routes: &dyn RouteTable) -> Result<Arc<Vec<SitemapNode>>> {
        let slot = self.slot(name);
        if let Some(nodes) = slot.nodes.load_full() {
            return Ok(nodes);
        }

        let _guard = slot.populate.lock();
        if let Some(nodes) = slot.nodes.load_full() {
            return Ok(nodes);
        }

        let nodes = Arc::new(self.scan(name, routes)?);
        slot.nodes.store(Some(Arc::clone(&nodes)));
        Ok(nodes)
    }

    /// Whether `name` has a published node set.
    pub fn is_populated(&self, name: &str) -> bool {
        self.slots
            .get(name)
            .is_some_and(|slot| slot.nodes.load().is_some())
    }

    /// Number of discovery scans run so far, across all names.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }

    fn slot(&self, name: &str) -> Arc<Slot> {
        if let Some(slot) = self.slots.get(name) {
            return Arc::clone(slot.value());
        }
        Arc::clone(self.slots.entry(name.to_owned()).or_default().value())
    }

    fn scan(&self, name: &str, routes: &dyn RouteTable) -> Result<Vec<SitemapNode>> {
        self.scans.fetch_add(1, Ordering::Relaxed);

        let hints = routes
            .discover()
            .with_context(|| format!("endpoint discovery failed for sitemap `{name}`"))?;

        // One fallback timestamp per scan
        let fallback = node::now();

        let mut nodes = Vec::new();
        for hint in hints.iter().filter(|h| h.sitemap_name() == name) {
            if let Some(node) = build_node(hint, routes, fallback)? {
                nodes.push(node);
            }
        }

        debug!("cache"; "sitemap `{}`: {} of {} endpoints included", name, nodes.len(), hints.len());
        Ok(nodes)
    }
}

/// Resolve and validate one endpoint. `Ok(None)` drops it from the sitemap.
fn build_node(
    hint: &EndpointHint,
    routes: &dyn RouteTable,
    fallback: Timestamp,
) -> Result<Option<SitemapNode>> {
    let url = routes
        .resolve(&hint.endpoint_id)
        .with_context(|| format!("failed to resolve endpoint `{}`", hint.endpoint_id))?;

    let Some(url) = url else {
        debug!("cache"; "skip `{}`: no url", hint.endpoint_id);
        return Ok(None);
    };
    if !uri::is_well_formed_absolute(&url) {
        debug!("cache"; "skip `{}`: malformed url {}", hint.endpoint_id, url);
        return Ok(None);
    }
    if !routes.supports_get(&url) {
        debug!("cache"; "skip `{}`: {} does not accept GET", hint.endpoint_id, url);
        return Ok(None);
    }

    Ok(Some(
        SitemapNode::new(url)
            .with_last_modified(hint.last_modified.unwrap_or(fallback))
            .with_frequency(hint.frequency)
            .with_priority(hint.priority),
    ))
}
