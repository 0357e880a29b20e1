//! Shardgate Connection - Session-level connection acquisition
//!
//! This crate hands out batches of physical connections to a session. It
//! caches acquired connections per data source, routes names of compute-node
//! instances through a lazily built traffic route table and releases partially
//! created batches when acquisition fails.

mod cache;
mod context;
mod manager;
mod random;
pub mod traffic;

#[cfg(test)]
mod test_support;

pub use cache::SessionConnectionCache;
pub use context::{ContextConfig, StandaloneContext};
pub use manager::ConnectionManager;
pub use random::choose_name;
pub use traffic::{TrafficRouteResolver, TrafficRouteTable};
