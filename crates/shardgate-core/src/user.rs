//! Users allowed to access compute-node instances

use serde::{Deserialize, Serialize};

/// A user and host pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grantee {
    pub username: String,
    #[serde(default = "default_hostname")]
    pub hostname: String,
}

fn default_hostname() -> String {
    "%".to_string()
}

/// A user loaded from the persisted global rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub grantee: Grantee,
    #[serde(default)]
    pub password: String,
}

impl User {
    pub fn new(username: &str, password: &str, hostname: &str) -> Self {
        Self {
            grantee: Grantee {
                username: username.to_string(),
                hostname: hostname.to_string(),
            },
            password: password.to_string(),
        }
    }

    pub fn username(&self) -> &str {
        &self.grantee.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}
