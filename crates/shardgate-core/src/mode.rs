//! Connection retention modes

use serde::{Deserialize, Serialize};

/// Strategy deciding whether connections created for a request are kept for
/// later requests of the same session.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionMode {
    /// Reuse first: every acquired connection is cached for the session
    MemoryStrictly,
    /// Hold as few connections as possible: only already cached connections
    /// are reused, the shortfall is handed out without being cached
    ConnectionStrictly,
}

impl ConnectionMode {
    /// Whether connections created under this mode join the session cache
    pub fn retains_new_connections(&self) -> bool {
        matches!(self, ConnectionMode::MemoryStrictly)
    }
}
