//! Lazily built traffic route table

use once_cell::sync::OnceCell;
use shardgate_core::{
    DataSource, DataSourceMap, InstanceType, MetaDataProvider, Result, ShardError,
};
use std::sync::Arc;

use super::properties::create_data_source_properties_map;

/// Pools of routed compute-node instances, keyed by instance id
#[derive(Default)]
pub struct TrafficRouteTable {
    data_sources: DataSourceMap,
}

impl TrafficRouteTable {
    /// A table routing nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(data_sources: DataSourceMap) -> Self {
        Self { data_sources }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DataSource>> {
        self.data_sources.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.data_sources.contains_key(name)
    }

    /// Routed instance ids, in instance order
    pub fn names(&self) -> Vec<String> {
        self.data_sources.keys().cloned().collect()
    }
}

/// Resolves names of compute-node instances to their pools
///
/// The table is built at most once per resolver, on first use, and never
/// refreshed: topology changes only show up in a new session. A failed build
/// is not remembered, the next lookup tries again.
pub struct TrafficRouteResolver {
    schema: String,
    table: OnceCell<TrafficRouteTable>,
}

impl TrafficRouteResolver {
    pub fn new(schema: &str) -> Self {
        Self {
            schema: schema.to_string(),
            table: OnceCell::new(),
        }
    }

    /// Whether the table has been built
    #[cfg(test)]
    pub(crate) fn is_resolved(&self) -> bool {
        self.table.get().is_some()
    }

    /// The route table, building it on first use
    ///
    /// Concurrent first callers block until a single build finishes.
    pub fn table(&self, provider: &dyn MetaDataProvider) -> Result<&TrafficRouteTable> {
        self.table
            .get_or_try_init(|| build_route_table(&self.schema, provider))
    }

    /// The routed pool for `name`, if `name` is a routed instance id
    pub fn route(
        &self,
        provider: &dyn MetaDataProvider,
        name: &str,
    ) -> Result<Option<Arc<dyn DataSource>>> {
        Ok(self.table(provider)?.get(name).cloned())
    }
}

#[tracing::instrument(skip(provider))]
fn build_route_table(schema: &str, provider: &dyn MetaDataProvider) -> Result<TrafficRouteTable> {
    let Some(rule) = provider.traffic_rule() else {
        tracing::debug!("no traffic rule configured, traffic routing disabled");
        return Ok(TrafficRouteTable::empty());
    };
    if rule.labels().is_empty() {
        tracing::debug!("traffic rule has no labels, traffic routing disabled");
        return Ok(TrafficRouteTable::empty());
    }
    let Some(persist) = provider.persist_service() else {
        tracing::debug!("no persisted metadata available, traffic routing disabled");
        return Ok(TrafficRouteTable::empty());
    };

    let instances = persist.load_compute_node_instances(InstanceType::Proxy, rule.labels())?;
    if instances.is_empty() {
        tracing::debug!(labels = ?rule.labels(), "no compute node instance matches traffic labels");
        return Ok(TrafficRouteTable::empty());
    }

    let data_source_props = persist.load_data_source_properties(schema)?;
    let sample = data_source_props.values().next().ok_or_else(|| {
        ShardError::Metadata("Can not get data source properties from meta data.".into())
    })?;
    let users = persist.load_users()?;
    let props = create_data_source_properties_map(&instances, &users, sample, schema)?;

    let table = TrafficRouteTable::new(provider.pool_creator().create_data_source_map(&props)?);
    tracing::info!(instances = ?table.names(), "traffic route table built");
    Ok(table)
}
