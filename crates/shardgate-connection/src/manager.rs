//! Connection manager for a single session

use parking_lot::Mutex;
use shardgate_core::{
    Connection, ConnectionMode, DataSource, MetaDataProvider, Result, ShardError,
};
use std::sync::Arc;

use crate::SessionConnectionCache;
use crate::random::choose_name;
use crate::traffic::TrafficRouteResolver;


/// Hands out physical connections to one session
///
/// The manager caches acquired connections per data source name and resolves
/// names of routed compute-node instances through its own traffic route table.
/// Both live exactly as long as the manager; the pools behind them belong to
/// the [`MetaDataProvider`].
///
/// A manager is meant to be driven by one caller at a time. Overlapping calls
/// are safe: new connections are appended to whatever the cache holds when
/// the call finishes, so none of them escape [`ConnectionManager::close`].
/// Connections it returns stay shared with its cache: callers must not close
/// them, use [`ConnectionManager::close`] to release the session instead.
pub struct ConnectionManager {
    /// Logical schema the session is bound to
    schema: String,

    /// Cluster metadata and physical pools
    provider: Arc<dyn MetaDataProvider>,

    /// Connections held by this session
    cache: Mutex<SessionConnectionCache>,

    /// Lazily built routes to compute-node instances
    traffic: TrafficRouteResolver,
}

impl ConnectionManager {
    /// Create a manager with an empty cache and an unresolved route table
    pub fn new(schema: &str, provider: Arc<dyn MetaDataProvider>) -> Self {
        tracing::debug!(schema = %schema, "creating connection manager");
        Self {
            schema: schema.to_string(),
            provider,
            cache: Mutex::new(SessionConnectionCache::new()),
            traffic: TrafficRouteResolver::new(schema),
        }
    }

    /// Pick a data source name when routing does not need a specific one
    ///
    /// Names this session already holds connections for are preferred, so the
    /// choice does not put pressure on another pool. Otherwise any physical
    /// data source of the schema may be picked. Returns `None` only when the
    /// schema has no data source at all.
    pub fn random_physical_data_source_name(&self) -> Option<String> {
        let cached = self.cache.lock().names();
        if !cached.is_empty() {
            return choose_name(cached);
        }
        choose_name(self.provider.data_source_map(&self.schema).keys())
    }

    /// Get exactly `count` connections for the data source `name`
    ///
    /// Connections already cached for `name` are reused first, in acquisition
    /// order; only the shortfall is opened, one at a time. If opening one of
    /// them fails, the ones opened before it are closed and
    /// [`ShardError::ConnectionAcquisitionFailed`] reports how many that were.
    /// The cache is left untouched by a failed call.
    ///
    /// Under [`ConnectionMode::MemoryStrictly`] the new connections join the
    /// cache; under [`ConnectionMode::ConnectionStrictly`] they are handed out
    /// without being cached.
    #[tracing::instrument(skip(self), fields(schema = %self.schema))]
    pub fn get_connections(
        &self,
        name: &str,
        count: usize,
        mode: ConnectionMode,
    ) -> Result<Vec<Arc<dyn Connection>>> {
        if name.is_empty() {
            return Err(ShardError::InvalidArgument(
                "data source name must not be empty".into(),
            ));
        }
        if count == 0 {
            return Err(ShardError::InvalidArgument(
                "connection count must be at least 1".into(),
            ));
        }

        let data_source = self.resolve_data_source(name)?;
        let mut result = self.cache.lock().get(name);
        if result.len() >= count {
            tracing::debug!(cached = result.len(), "connections served from cache");
            result.truncate(count);
            return Ok(result);
        }

        let shortfall = count - result.len();
        tracing::debug!(cached = result.len(), shortfall, "opening missing connections");
        let created = create_connections(data_source.as_ref(), count, shortfall)?;
        if mode.retains_new_connections() {
            self.cache.lock().append(name, &created);
        }
        result.extend(created);
        Ok(result)
    }

    /// Resolve `name` against the traffic route table, then the physical data sources
    fn resolve_data_source(&self, name: &str) -> Result<Arc<dyn DataSource>> {
        if let Some(routed) = self.traffic.route(self.provider.as_ref(), name)? {
            tracing::debug!(data_source = %name, "data source routed to compute node instance");
            return Ok(routed);
        }
        self.provider
            .data_source_map(&self.schema)
            .get(name)
            .cloned()
            .ok_or_else(|| ShardError::UnknownDataSource(name.to_string()))
    }

    /// Check whether `name` is the id of a routed compute-node instance
    pub fn is_traffic_routed(&self, name: &str) -> Result<bool> {
        Ok(self.traffic.table(self.provider.as_ref())?.contains(name))
    }

    /// Connections this session currently caches for `name`
    pub fn cached_connections(&self, name: &str) -> Vec<Arc<dyn Connection>> {
        self.cache.lock().get(name)
    }

    /// Data source names with cached connections, in first-use order
    pub fn cached_data_source_names(&self) -> Vec<String> {
        self.cache.lock().names()
    }

    /// Check that no cached connection has been closed
    pub fn is_valid(&self) -> bool {
        self.cache
            .lock()
            .iter()
            .all(|(_, connections)| connections.iter().all(|conn| !conn.is_closed()))
    }

    /// Release every cached connection and empty the cache
    ///
    /// All connections are attempted even if some fail to close; the failures
    /// are reported together afterwards.
    #[tracing::instrument(skip(self), fields(schema = %self.schema))]
    pub fn close(&self) -> Result<()> {
        let (total, entries) = {
            let mut cache = self.cache.lock();
            (cache.total(), cache.drain())
        };
        let mut failed = 0;
        for (name, connections) in entries {
            tracing::debug!(data_source = %name, count = connections.len(), "releasing cached connections");
            failed += release_connections(&connections);
        }
        if failed > 0 {
            return Err(ShardError::ReleaseFailed { failed, total });
        }
        Ok(())
    }
}

/// Open `shortfall` connections from `data_source` as a single batch
///
/// Either all of them are returned or none: on failure the connections opened
/// so far are closed before the error is returned.
fn create_connections(
    data_source: &dyn DataSource,
    count: usize,
    shortfall: usize,
) -> Result<Vec<Arc<dyn Connection>>> {
    let mut created = Vec::new();
    for _ in 0..shortfall {
        match data_source.get_connection() {
            Ok(conn) => created.push(conn),
            Err(e) => {
                let succeeded = created.len();
                tracing::error!(error = %e, succeeded, "failed to open connection, releasing batch");
                release_connections(&created);
                return Err(ShardError::acquisition_failed(count, succeeded, e));
            }
        }
    }
    Ok(created)
}

/// Close `connections` in order, returning how many failed to close
fn release_connections(connections: &[Arc<dyn Connection>]) -> usize {
    let mut failed = 0;
    for conn in connections {
        if let Err(e) = conn.close() {
            tracing::warn!(error = %e, "failed to release connection");
            failed += 1;
        }
    }
    failed
}
