//! Traffic rule

use serde::{Deserialize, Serialize};

/// Routing policy redirecting traffic to compute-node instances that carry
/// one of the rule's labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficRule {
    #[serde(default)]
    labels: Vec<String>,
}

impl TrafficRule {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Labels governing which instances receive routed traffic
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
