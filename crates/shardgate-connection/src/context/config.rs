//! Standalone deployment configuration

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use shardgate_core::{
    ComputeNodeInstance, DataSourceProperties, Result, ShardError, TrafficRule, User,
};
use std::path::Path;

/// Everything a standalone deployment knows about its cluster
///
/// ```toml
/// schema = "logic_db"
///
/// [data_sources.ds_0]
/// pool_type = "hikari"
/// props = { jdbcUrl = "jdbc:mysql://127.0.0.1:3306/demo_ds_0", username = "root" }
///
/// [traffic]
/// labels = ["OLTP"]
///
/// [[instances]]
/// type = "proxy"
/// id = "127.0.0.1@3307"
/// labels = ["OLTP"]
///
/// [[users]]
/// username = "root"
/// password = "root"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Logical schema served by the deployment
    pub schema: String,

    /// Physical data sources of the schema, in declaration order
    #[serde(default)]
    pub data_sources: IndexMap<String, DataSourceProperties>,

    /// Traffic rule of the global rule set
    #[serde(default)]
    pub traffic: Option<TrafficRule>,

    /// Registered compute-node instances
    #[serde(default)]
    pub instances: Vec<ComputeNodeInstance>,

    /// Users of the global authority rule
    #[serde(default)]
    pub users: Vec<User>,
}

impl ContextConfig {
    /// Parse a configuration from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ShardError::Configuration(format!("Invalid context config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    #[tracing::instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            schema = %config.schema,
            data_sources = config.data_sources.len(),
            instances = config.instances.len(),
            "context config loaded"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.schema.is_empty() {
            return Err(ShardError::Configuration("schema must not be empty".into()));
        }
        if self.data_sources.is_empty() {
            return Err(ShardError::Configuration(format!(
                "schema '{}' has no data sources",
                self.schema
            )));
        }
        Ok(())
    }
}
