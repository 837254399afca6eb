//! Runtime-registered nodes, keyed by sitemap name.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::node::SitemapNode;

/// Thread-safe storage for nodes added through the service API.
///
/// Each name maps to an immutable snapshot. Replacing a set swaps the whole
/// `Arc`, so readers observe either the previous set or the new one.
#[derive(Debug, Default)]
pub struct DynamicNodeRegistry {
    sets: RwLock<FxHashMap<String, Arc<Vec<SitemapNode>>>>,
}

impl DynamicNodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the node set registered under `name`.
    pub fn set(&self, name: &str, nodes: impl IntoIterator<Item = SitemapNode>) {
        let nodes = Arc::new(nodes.into_iter().collect::<Vec<_>>());
        self.sets.write().insert(name.to_owned(), nodes);
    }

    /// Current node set for `name` (empty when nothing was registered).
    pub fn get(&self, name: &str) -> Arc<Vec<SitemapNode>> {
        self.sets.read().get(name).cloned().unwrap_or_default()
    }
}
