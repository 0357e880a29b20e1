//! Mock collaborators shared by the unit tests

use indexmap::IndexMap;
use parking_lot::Mutex;
use shardgate_core::{
    ComputeNodeInstance, Connection, DataSource, DataSourceMap, DataSourcePoolCreator,
    DataSourceProperties, InstanceDefinition, InstanceType, MetaDataPersistService,
    MetaDataProvider, Result, ShardError, TrafficRule, URL_KEY, User,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Initialize logging for tests if not already initialized
pub fn init_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("shardgate_connection=debug".parse().unwrap()),
            )
            .with_test_writer()
            .finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Mock connection for testing
pub struct MockConnection {
    #[allow(dead_code)]
    id: usize,
    closed: AtomicBool,
    fail_close: bool,
}

impl MockConnection {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            closed: AtomicBool::new(false),
            fail_close: false,
        }
    }

    fn failing_close(id: usize) -> Self {
        Self {
            fail_close: true,
            ..Self::new(id)
        }
    }
}

impl Connection for MockConnection {
    fn close(&self) -> Result<()> {
        if self.fail_close {
            return Err(ShardError::Connection("close refused".into()));
        }
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Mock data source counting opened connections
///
/// Opening fails once `fail_after` connections have been handed out.
pub struct MockDataSource {
    opened: AtomicUsize,
    fail_after: Option<usize>,
    fail_close: bool,
    handed_out: Mutex<Vec<Arc<dyn Connection>>>,
}

impl MockDataSource {
    pub fn new() -> Self {
        Self {
            opened: AtomicUsize::new(0),
            fail_after: None,
            fail_close: false,
            handed_out: Mutex::new(Vec::new()),
        }
    }

    /// A data source whose every open attempt fails
    pub fn invalid() -> Self {
        Self::failing_after(0)
    }

    pub fn failing_after(succeeding: usize) -> Self {
        Self {
            fail_after: Some(succeeding),
            ..Self::new()
        }
    }

    /// Connections handed out by this source refuse to close
    pub fn with_failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Number of handed out connections that have been closed
    pub fn closed(&self) -> usize {
        self.handed_out
            .lock()
            .iter()
            .filter(|conn| conn.is_closed())
            .count()
    }
}

impl DataSource for MockDataSource {
    fn get_connection(&self) -> Result<Arc<dyn Connection>> {
        let id = self.opened.load(Ordering::SeqCst);
        if self.fail_after.is_some_and(|limit| id >= limit) {
            return Err(ShardError::Connection("connection refused".into()));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        let conn: Arc<dyn Connection> = if self.fail_close {
            Arc::new(MockConnection::failing_close(id))
        } else {
            Arc::new(MockConnection::new(id))
        };
        self.handed_out.lock().push(conn.clone());
        Ok(conn)
    }
}

/// Mock pool creator recording the properties it was asked to build
#[derive(Default)]
pub struct MockPoolCreator {
    pub created: Mutex<Vec<DataSourceProperties>>,
    pub fail: AtomicBool,
}

impl DataSourcePoolCreator for MockPoolCreator {
    fn create_data_source(&self, props: &DataSourceProperties) -> Result<Arc<dyn DataSource>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ShardError::Configuration("unsupported pool".into()));
        }
        self.created.lock().push(props.clone());
        Ok(Arc::new(MockDataSource::new()))
    }
}

/// Mock persisted metadata
#[derive(Clone)]
pub struct MockPersistService {
    pub data_source_props: IndexMap<String, DataSourceProperties>,
    pub instances: Vec<ComputeNodeInstance>,
    pub users: Vec<User>,
}

impl MetaDataPersistService for MockPersistService {
    fn load_data_source_properties(
        &self,
        _schema: &str,
    ) -> Result<IndexMap<String, DataSourceProperties>> {
        Ok(self.data_source_props.clone())
    }

    fn load_compute_node_instances(
        &self,
        instance_type: InstanceType,
        labels: &[String],
    ) -> Result<Vec<ComputeNodeInstance>> {
        Ok(self
            .instances
            .iter()
            .filter(|each| each.definition().instance_type() == instance_type)
            .filter(|each| each.matches_any_label(labels))
            .cloned()
            .collect())
    }

    fn load_users(&self) -> Result<Vec<User>> {
        Ok(self.users.clone())
    }
}

/// Mock metadata provider with swappable parts
pub struct MockMetaData {
    pub data_sources: DataSourceMap,
    pub traffic_rule: Option<TrafficRule>,
    pub persist: Option<Arc<MockPersistService>>,
    pub pool_creator: Arc<MockPoolCreator>,
}

impl MetaDataProvider for MockMetaData {
    fn data_source_map(&self, _schema: &str) -> DataSourceMap {
        self.data_sources.clone()
    }

    fn traffic_rule(&self) -> Option<TrafficRule> {
        self.traffic_rule.clone()
    }

    fn persist_service(&self) -> Option<Arc<dyn MetaDataPersistService>> {
        self.persist
            .clone()
            .map(|persist| persist as Arc<dyn MetaDataPersistService>)
    }

    fn pool_creator(&self) -> Arc<dyn DataSourcePoolCreator> {
        self.pool_creator.clone()
    }
}

pub const SCHEMA: &str = "logic_db";
pub const ROUTED_INSTANCE: &str = "127.0.0.1@3307";

/// A schema with a healthy `ds`, an unreachable `invalid_ds` and a traffic
/// rule routing `OLTP`/`OLAP` traffic to one proxy instance
pub struct Fixture {
    pub ds: Arc<MockDataSource>,
    pub invalid_ds: Arc<MockDataSource>,
    pub pool_creator: Arc<MockPoolCreator>,
    pub traffic_rule: Option<TrafficRule>,
    pub persist: Option<MockPersistService>,
}

impl Fixture {
    pub fn new() -> Self {
        init_logging();
        let mut data_source_props = IndexMap::new();
        data_source_props.insert(
            "ds".to_string(),
            DataSourceProperties::new("hikari")
                .with_prop(
                    URL_KEY,
                    "jdbc:mysql://127.0.0.1:3306/demo_ds_0?serverTimezone=UTC&useSSL=false",
                )
                .with_prop("username", "app")
                .with_prop("password", "123456")
                .with_prop("maximumPoolSize", 10),
        );
        Self {
            ds: Arc::new(MockDataSource::new()),
            invalid_ds: Arc::new(MockDataSource::invalid()),
            pool_creator: Arc::new(MockPoolCreator::default()),
            traffic_rule: Some(TrafficRule::new(["OLTP", "OLAP"])),
            persist: Some(MockPersistService {
                data_source_props,
                instances: vec![ComputeNodeInstance::new(
                    InstanceDefinition::new(InstanceType::Proxy, ROUTED_INSTANCE),
                    ["OLTP"],
                )],
                users: vec![User::new("root", "root", "localhost")],
            }),
        }
    }

    pub fn without_traffic_rule(mut self) -> Self {
        self.traffic_rule = None;
        self
    }

    pub fn metadata(&self) -> Arc<MockMetaData> {
        let mut data_sources: DataSourceMap = IndexMap::new();
        data_sources.insert("ds".to_string(), self.ds.clone());
        data_sources.insert("invalid_ds".to_string(), self.invalid_ds.clone());
        Arc::new(MockMetaData {
            data_sources,
            traffic_rule: self.traffic_rule.clone(),
            persist: self.persist.clone().map(Arc::new),
            pool_creator: self.pool_creator.clone(),
        })
    }
}
