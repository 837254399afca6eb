//! In-memory node stores backing every named sitemap.
//!
//! | Store                 | Filled by                   | Lifetime                     |
//! |-----------------------|-----------------------------|------------------------------|
//! | [`StaticNodeCache`]   | endpoint discovery, lazily  | populated once per name      |
//! | [`DynamicNodeRegistry`] | `add_nodes` at runtime    | replaced wholesale per name  |

mod dynamic_nodes;
mod static_nodes;

pub use dynamic_nodes::DynamicNodeRegistry;
pub use static_nodes::StaticNodeCache;
