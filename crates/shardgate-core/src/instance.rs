//! Compute-node instances of a cluster

use serde::{Deserialize, Serialize};

/// Kind of compute node
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InstanceType {
    /// Standalone proxy exposing its own endpoint
    Proxy,
    /// Driver embedded in an application
    Jdbc,
}

/// Identity of a compute-node instance
///
/// The id has the form `ip@unique_sign`, where the unique sign of a proxy is
/// the port it listens on. The whole id is the key traffic routing uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "InstanceDefinitionRepr", from = "InstanceDefinitionRepr")]
pub struct InstanceDefinition {
    instance_type: InstanceType,
    id: String,
    ip: String,
    unique_sign: String,
}

#[derive(Serialize, Deserialize)]
struct InstanceDefinitionRepr {
    #[serde(rename = "type")]
    instance_type: InstanceType,
    id: String,
}

impl From<InstanceDefinitionRepr> for InstanceDefinition {
    fn from(repr: InstanceDefinitionRepr) -> Self {
        Self::new(repr.instance_type, &repr.id)
    }
}

impl From<InstanceDefinition> for InstanceDefinitionRepr {
    fn from(definition: InstanceDefinition) -> Self {
        Self {
            instance_type: definition.instance_type,
            id: definition.id,
        }
    }
}

impl InstanceDefinition {
    /// Create a definition from an `ip@unique_sign` id
    ///
    /// An id without `@` is kept as the ip with an empty unique sign.
    pub fn new(instance_type: InstanceType, id: &str) -> Self {
        let (ip, unique_sign) = id.split_once('@').unwrap_or((id, ""));
        Self {
            instance_type,
            id: id.to_string(),
            ip: ip.to_string(),
            unique_sign: unique_sign.to_string(),
        }
    }

    pub fn instance_type(&self) -> InstanceType {
        self.instance_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    pub fn unique_sign(&self) -> &str {
        &self.unique_sign
    }
}

/// A cluster member with its labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeNodeInstance {
    #[serde(flatten)]
    definition: InstanceDefinition,
    #[serde(default)]
    labels: Vec<String>,
}

impl ComputeNodeInstance {
    pub fn new<I, S>(definition: InstanceDefinition, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            definition,
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn definition(&self) -> &InstanceDefinition {
        &self.definition
    }

    pub fn id(&self) -> &str {
        self.definition.id()
    }

    /// Check whether the instance carries at least one of `labels`
    pub fn matches_any_label(&self, labels: &[String]) -> bool {
        self.labels.iter().any(|label| labels.contains(label))
    }
}
