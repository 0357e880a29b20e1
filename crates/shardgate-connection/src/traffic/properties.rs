//! Derivation of pool properties for compute-node instances

use indexmap::IndexMap;
use shardgate_core::{
    ComputeNodeInstance, DataSourceProperties, InstanceDefinition, PASSWORD_KEY, Result,
    ShardError, URL_KEY, USERNAME_KEY, User,
};

/// Build the properties of one pool per instance, keyed by instance id
///
/// Every entry starts from `sample`, points its url at the instance and
/// authenticates as the first of `users`.
pub fn create_data_source_properties_map(
    instances: &[ComputeNodeInstance],
    users: &[User],
    sample: &DataSourceProperties,
    schema: &str,
) -> Result<IndexMap<String, DataSourceProperties>> {
    let user = users.first().ok_or_else(|| {
        ShardError::Metadata("Can not find any user to access compute node instances.".into())
    })?;
    let mut result = IndexMap::with_capacity(instances.len());
    for each in instances {
        result.insert(
            each.id().to_string(),
            create_data_source_properties(each.definition(), user, sample, schema)?,
        );
    }
    Ok(result)
}

fn create_data_source_properties(
    definition: &InstanceDefinition,
    user: &User,
    sample: &DataSourceProperties,
    schema: &str,
) -> Result<DataSourceProperties> {
    let url = sample.url().ok_or_else(|| {
        ShardError::Configuration(format!("Data source properties have no '{URL_KEY}'"))
    })?;
    Ok(sample
        .clone()
        .with_prop(URL_KEY, create_url(definition, schema, &url)?)
        .with_prop(USERNAME_KEY, user.username())
        .with_prop(PASSWORD_KEY, user.password()))
}

/// Point `url` at an instance, keeping its scheme and query string
///
/// `jdbc:mysql://127.0.0.1:3306/demo_ds_0?useSSL=false` routed to
/// `10.0.0.1@3307` for schema `logic_db` becomes
/// `jdbc:mysql://10.0.0.1:3307/logic_db?useSSL=false`.
pub fn create_url(definition: &InstanceDefinition, schema: &str, url: &str) -> Result<String> {
    let prefix_end = url
        .find("//")
        .ok_or_else(|| ShardError::Configuration(format!("Invalid url '{url}'")))?;
    let prefix = &url[..prefix_end];
    let suffix = url.find('?').map_or("", |idx| &url[idx..]);
    Ok(format!(
        "{prefix}//{}:{}/{schema}{suffix}",
        definition.ip(),
        definition.unique_sign()
    ))
}
