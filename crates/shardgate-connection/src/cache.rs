//! Per-session cache of acquired connections

use indexmap::IndexMap;
use shardgate_core::Connection;
use std::sync::Arc;

/// Connections held by one session, keyed by data source name
///
/// Entries keep acquisition order, so reused connections always come back in
/// the order they were first handed out.
#[derive(Default)]
pub struct SessionConnectionCache {
    entries: IndexMap<String, Vec<Arc<dyn Connection>>>,
}

impl SessionConnectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the connections cached for `name`
    pub fn get(&self, name: &str) -> Vec<Arc<dyn Connection>> {
        self.entries.get(name).cloned().unwrap_or_default()
    }

    /// Add `connections` after the ones already cached for `name`
    pub fn append(&mut self, name: &str, connections: &[Arc<dyn Connection>]) {
        self.entries
            .entry(name.to_string())
            .or_default()
            .extend_from_slice(connections);
    }

    /// Names with cached connections, in insertion order
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Total number of cached connections
    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Arc<dyn Connection>])> {
        self.entries
            .iter()
            .map(|(name, connections)| (name.as_str(), connections.as_slice()))
    }

    /// Remove every entry, returning them in insertion order
    pub fn drain(&mut self) -> Vec<(String, Vec<Arc<dyn Connection>>)> {
        self.entries.drain(..).collect()
    }
}
