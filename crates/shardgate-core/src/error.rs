//! Error types for Shardgate

use thiserror::Error;

/// Core error type for Shardgate operations
#[derive(Error, Debug)]
pub enum ShardError {
    #[error("Missing the data source name: '{0}'")]
    UnknownDataSource(String),

    #[error(
        "Can not get {count} connections one time, partition succeed connection({succeeded}) have released!"
    )]
    ConnectionAcquisitionFailed {
        /// Number of connections the caller asked for
        count: usize,
        /// Number of new connections opened (and released) before the failing one
        succeeded: usize,
        #[source]
        source: Box<ShardError>,
    },

    #[error("Failed to release {failed} of {total} connections")]
    ReleaseFailed { failed: usize, total: usize },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl ShardError {
    /// Wrap the error that interrupted a batch of connection creations
    pub fn acquisition_failed(count: usize, succeeded: usize, source: ShardError) -> Self {
        Self::ConnectionAcquisitionFailed {
            count,
            succeeded,
            source: Box::new(source),
        }
    }
}

/// Result type alias for Shardgate operations
pub type Result<T> = std::result::Result<T, ShardError>;
