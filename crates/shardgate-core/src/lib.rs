//! Shardgate Core - Shared abstractions for the sharding driver
//!
//! This crate provides the vocabulary that the connection layer and its
//! collaborators agree on:
//!
//! - `Connection` / `DataSource` - Traits for physical connections and the pools handing them out
//! - `ConnectionMode` - Retention strategy for acquired connections
//! - `MetaDataProvider` / `MetaDataPersistService` - Cluster metadata access
//! - `DataSourcePoolCreator` - Materialises pools from `DataSourceProperties`
//! - Cluster types like `ComputeNodeInstance`, `TrafficRule` and `User`

mod connection;
mod datasource;
mod error;
mod instance;
mod metadata;
mod mode;
mod rule;
mod user;

pub use connection::*;
pub use datasource::*;
pub use error::*;
pub use instance::*;
pub use metadata::*;
pub use mode::*;
pub use rule::*;
pub use user::*;
