//! Connection and data source traits

use crate::Result;
use std::sync::Arc;

/// A physical database connection
///
/// Connections are shared as `Arc<dyn Connection>` between the session cache
/// of a connection manager and the callers it hands them to. A caller must not
/// close a connection that is still cached by its manager; the manager
/// releases cached connections itself when the session is closed.
pub trait Connection: Send + Sync {
    /// Close the connection
    fn close(&self) -> Result<()>;

    /// Check if the connection is closed
    fn is_closed(&self) -> bool;
}

/// A source of physical connections, usually a pool
///
/// Data sources are owned by the metadata layer and shared by every session
/// of a schema. Implementations synchronise internally; the connection layer
/// never assumes exclusive access and never closes a data source.
pub trait DataSource: Send + Sync {
    /// Open (or borrow from the pool) a connection.
    ///
    /// May block while the underlying pool establishes a physical connection.
    fn get_connection(&self) -> Result<Arc<dyn Connection>>;
}
