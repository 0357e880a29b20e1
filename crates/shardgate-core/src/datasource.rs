//! Data source properties

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Property key holding the connection url
pub const URL_KEY: &str = "jdbcUrl";
/// Property key holding the user name
pub const USERNAME_KEY: &str = "username";
/// Property key holding the password
pub const PASSWORD_KEY: &str = "password";

/// Persisted description of a pooled data source
///
/// Properties are kept in a generic, ordered map; translating them into the
/// settings of a concrete pool implementation is up to the
/// [`DataSourcePoolCreator`](crate::DataSourcePoolCreator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceProperties {
    /// Pool implementation the properties are meant for
    pub pool_type: String,
    /// Pool and connection properties
    #[serde(default)]
    pub props: IndexMap<String, Value>,
}

impl DataSourceProperties {
    pub fn new(pool_type: &str) -> Self {
        Self {
            pool_type: pool_type.to_string(),
            props: IndexMap::new(),
        }
    }

    /// Set a property
    pub fn with_prop(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.props.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// Get a property rendered as a string, if present
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.props.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// The connection url, if configured
    pub fn url(&self) -> Option<String> {
        self.get_str(URL_KEY)
    }
}
