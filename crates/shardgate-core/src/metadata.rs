//! Collaborator traits for cluster metadata and pool creation

use crate::{
    ComputeNodeInstance, DataSource, DataSourceProperties, InstanceType, Result, TrafficRule,
    User,
};
use indexmap::IndexMap;
use std::sync::Arc;

/// Data sources keyed by name, in registration order
pub type DataSourceMap = IndexMap<String, Arc<dyn DataSource>>;

/// Read access to the metadata of a running cluster
///
/// Shared by every connection manager of the process; implementations must be
/// internally synchronised.
pub trait MetaDataProvider: Send + Sync {
    /// Physical data sources of a logical schema
    fn data_source_map(&self, schema: &str) -> DataSourceMap;

    /// The traffic rule of the global rule set, if one is configured
    fn traffic_rule(&self) -> Option<TrafficRule>;

    /// Persisted metadata, if the deployment persists any
    fn persist_service(&self) -> Option<Arc<dyn MetaDataPersistService>>;

    /// Collaborator used to build pools for routed compute-node instances
    fn pool_creator(&self) -> Arc<dyn DataSourcePoolCreator>;
}

/// Persisted cluster metadata
pub trait MetaDataPersistService: Send + Sync {
    /// Data source properties persisted for a schema, in persisted order
    fn load_data_source_properties(
        &self,
        schema: &str,
    ) -> Result<IndexMap<String, DataSourceProperties>>;

    /// Instances of `instance_type` whose labels intersect `labels`
    fn load_compute_node_instances(
        &self,
        instance_type: InstanceType,
        labels: &[String],
    ) -> Result<Vec<ComputeNodeInstance>>;

    /// Users of the global authority rule
    fn load_users(&self) -> Result<Vec<User>>;
}

/// Builds pooled data sources from generic properties
pub trait DataSourcePoolCreator: Send + Sync {
    /// Create one data source
    fn create_data_source(&self, props: &DataSourceProperties) -> Result<Arc<dyn DataSource>>;

    /// Create a data source for every entry, keeping the order and keys of `props`
    ///
    /// Stops at the first failure.
    fn create_data_source_map(
        &self,
        props: &IndexMap<String, DataSourceProperties>,
    ) -> Result<DataSourceMap> {
        let mut result = IndexMap::with_capacity(props.len());
        for (name, each) in props {
            tracing::debug!(data_source = %name, pool_type = %each.pool_type, "creating data source");
            result.insert(name.clone(), self.create_data_source(each)?);
        }
        Ok(result)
    }
}
