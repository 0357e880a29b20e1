//! In-memory cluster metadata for standalone deployments

mod config;


pub use config::ContextConfig;

use indexmap::IndexMap;
use shardgate_core::{
    ComputeNodeInstance, DataSourceMap, DataSourcePoolCreator, DataSourceProperties,
    InstanceType, MetaDataPersistService, MetaDataProvider, Result, TrafficRule, User,
};
use std::sync::Arc;

/// Metadata of a deployment described entirely by a [`ContextConfig`]
///
/// Physical pools are created once, when the context is built, and shared by
/// every connection manager created on top of it. The context doubles as its
/// own persistence layer.
pub struct StandaloneContext {
    persist: Arc<ConfigPersistService>,
    data_sources: DataSourceMap,
    pool_creator: Arc<dyn DataSourcePoolCreator>,
}

impl StandaloneContext {
    /// Build the physical pools of `config` with `pool_creator`
    #[tracing::instrument(skip_all, fields(schema = %config.schema))]
    pub fn new(config: ContextConfig, pool_creator: Arc<dyn DataSourcePoolCreator>) -> Result<Self> {
        let data_sources = pool_creator.create_data_source_map(&config.data_sources)?;
        tracing::info!(data_sources = data_sources.len(), "standalone context ready");
        Ok(Self {
            persist: Arc::new(ConfigPersistService { config }),
            data_sources,
            pool_creator,
        })
    }

    /// Logical schema served by this context
    pub fn schema(&self) -> &str {
        &self.persist.config.schema
    }
}

impl MetaDataProvider for StandaloneContext {
    fn data_source_map(&self, schema: &str) -> DataSourceMap {
        if schema == self.schema() {
            self.data_sources.clone()
        } else {
            tracing::warn!(schema = %schema, "schema not served by this context");
            DataSourceMap::new()
        }
    }

    fn traffic_rule(&self) -> Option<TrafficRule> {
        self.persist.config.traffic.clone()
    }

    fn persist_service(&self) -> Option<Arc<dyn MetaDataPersistService>> {
        Some(self.persist.clone() as Arc<dyn MetaDataPersistService>)
    }

    fn pool_creator(&self) -> Arc<dyn DataSourcePoolCreator> {
        self.pool_creator.clone()
    }
}

/// Persisted metadata view over a configuration snapshot
struct ConfigPersistService {
    config: ContextConfig,
}

impl MetaDataPersistService for ConfigPersistService {
    fn load_data_source_properties(
        &self,
        schema: &str,
    ) -> Result<IndexMap<String, DataSourceProperties>> {
        if schema == self.config.schema {
            Ok(self.config.data_sources.clone())
        } else {
            Ok(IndexMap::new())
        }
    }

    fn load_compute_node_instances(
        &self,
        instance_type: InstanceType,
        labels: &[String],
    ) -> Result<Vec<ComputeNodeInstance>> {
        Ok(self
            .config
            .instances
            .iter()
            .filter(|each| each.definition().instance_type() == instance_type)
            .filter(|each| each.matches_any_label(labels))
            .cloned()
            .collect())
    }

    fn load_users(&self) -> Result<Vec<User>> {
        Ok(self.config.users.clone())
    }
}
