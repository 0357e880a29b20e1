//! Traffic routing to compute-node instances
//!
//! When the global rule set carries a traffic rule, names of compute-node
//! instances (`ip@port`) become valid data source names for a session. The
//! [`TrafficRouteResolver`] builds the table mapping those ids to freshly
//! created pools the first time a session asks for it, deriving each pool's
//! properties from the persisted data sources of the schema.

mod properties;
mod resolver;


pub use properties::{create_data_source_properties_map, create_url};
pub use resolver::{TrafficRouteResolver, TrafficRouteTable};
