use std::sync::Arc;

use arc_swap::ArcSwap;
use sea_orm::DbBackend;
use serde::Deserialize;
use snafu::ResultExt;
use strum::{Display, EnumString};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::error::{Result, StatementFailureSnafu};
use crate::executor::StatementExecutor;
use crate::partition::dialect::{AlterTableDialect, DialectStrategy, PartitionOfDialect};

const VERSION_SQL: &str = "SELECT version()";
const PLUGINS_SQL: &str = "SHOW PLUGINS";
const HAVE_PARTITIONING_SQL: &str = "SHOW VARIABLES LIKE 'have_partitioning'";

/// 分区语法族
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Display, EnumString)]
pub enum Dialect {
    /// MySQL [5.1, 5.6), 由 `have_partitioning` 变量决定
    #[strum(to_string = "mysql-legacy")]
    MysqlLegacy,
    /// MySQL [5.6, 8), 由 `partition` 插件决定
    #[strum(to_string = "mysql-plugin")]
    MysqlPlugin,
    /// MySQL 8 及以上, 始终支持
    #[strum(to_string = "mysql-native", serialize = "mysql")]
    MysqlNative,
    /// PostgreSQL 声明式分区
    #[strum(to_string = "postgres-declarative", serialize = "postgres")]
    PostgresDeclarative,
}

impl Dialect {
    pub fn is_declarative(self) -> bool {
        matches!(self, Dialect::PostgresDeclarative)
    }

    pub fn strategy(self) -> &'static dyn DialectStrategy {
        match self {
            Dialect::MysqlLegacy | Dialect::MysqlPlugin | Dialect::MysqlNative => &AlterTableDialect,
            Dialect::PostgresDeclarative => &PartitionOfDialect,
        }
    }
}

/// 检测结果
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CapabilityState {
    pub supported: bool,
    pub checked: bool,
    pub dialect: Option<Dialect>,
}

impl CapabilityState {
    fn supported(dialect: Dialect) -> Self {
        Self { supported: true, checked: true, dialect: Some(dialect) }
    }

    fn unsupported(dialect: Option<Dialect>) -> Self {
        Self { supported: false, checked: true, dialect }
    }
}

/// `major.minor` prefix of a server version string.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
}

impl ServerVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// 解析 `5.7.0-log`, `8.0.36`, `10.11.6-MariaDB` 之类的版本串
    pub fn parse(version: &str) -> Option<Self> {
        let mut parts = version.trim().split('.');
        let major = leading_number(parts.next()?)?;
        let minor = parts.next().and_then(leading_number).unwrap_or(0);
        Some(Self { major, minor })
    }
}

fn leading_number(part: &str) -> Option<u32> {
    let end = part.find(|c: char| !c.is_ascii_digit()).unwrap_or(part.len());
    part[..end].parse().ok()
}

#[derive(Deserialize)]
struct PluginRow {
    #[serde(rename = "Name")]
    name: String,
}

/// 查询服务端并判断是否支持分区
pub async fn detect<E>(executor: &E) -> Result<CapabilityState>
where
    E: StatementExecutor + ?Sized,
{
    match executor.backend() {
        DbBackend::Postgres => return Ok(CapabilityState::supported(Dialect::PostgresDeclarative)),
        DbBackend::MySql => {}
        backend => {
            warn!(?backend, "backend has no table partitioning");
            return Ok(CapabilityState::unsupported(None));
        }
    }

    let version = executor.server_version().await.context(StatementFailureSnafu { statement: VERSION_SQL })?;
    let Some(parsed) = ServerVersion::parse(&version) else {
        warn!(%version, "unrecognised server version");
        return Ok(CapabilityState::unsupported(None));
    };

    let state = if parsed >= ServerVersion::new(8, 0) {
        CapabilityState::supported(Dialect::MysqlNative)
    } else if parsed >= ServerVersion::new(5, 6) {
        let rows = executor.query(PLUGINS_SQL).await.context(StatementFailureSnafu { statement: PLUGINS_SQL })?;
        let loaded = rows
            .into_iter()
            .filter_map(|row| serde_json::from_value::<PluginRow>(row).ok())
            .any(|plugin| plugin.name == "partition");
        if loaded {
            CapabilityState::supported(Dialect::MysqlPlugin)
        } else {
            CapabilityState::unsupported(Some(Dialect::MysqlPlugin))
        }
    } else if parsed >= ServerVersion::new(5, 1) {
        let rows = executor
            .query(HAVE_PARTITIONING_SQL)
            .await
            .context(StatementFailureSnafu { statement: HAVE_PARTITIONING_SQL })?;
        if rows.is_empty() {
            CapabilityState::unsupported(Some(Dialect::MysqlLegacy))
        } else {
            CapabilityState::supported(Dialect::MysqlLegacy)
        }
    } else {
        CapabilityState::unsupported(None)
    };

    if state.supported {
        info!(%version, dialect = ?state.dialect, "partitioning supported");
    } else {
        warn!(%version, "partitioning unsupported");
    }
    Ok(state)
}

/// 分区能力缓存
///
/// 每个连接/会话构造一次; clone 后共享同一份结果。首次 `get` 时检测,
/// 并发的首次访问只会触发一次检测, 之后只读, 直到显式 `reset`。
#[derive(Clone)]
pub struct CapabilityCache {
    cell: Arc<ArcSwap<OnceCell<CapabilityState>>>,
}

impl Default for CapabilityCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityCache {
    pub fn new() -> Self {
        Self { cell: Arc::new(ArcSwap::from_pointee(OnceCell::new())) }
    }

    /// 直接指定方言, 不再查询服务端
    pub fn with_dialect(dialect: Dialect) -> Self {
        let cell = OnceCell::new_with(Some(CapabilityState::supported(dialect)));
        Self { cell: Arc::new(ArcSwap::from_pointee(cell)) }
    }

    pub async fn get<E>(&self, executor: &E) -> Result<CapabilityState>
    where
        E: StatementExecutor + ?Sized,
    {
        let cell = self.cell.load_full();
        cell.get_or_try_init(|| detect(executor)).await.copied()
    }

    /// 当前缓存值, 尚未检测时 `checked` 为 false
    pub fn peek(&self) -> CapabilityState {
        self.cell.load().get().copied().unwrap_or_default()
    }

    pub fn reset(&self) {
        self.cell.store(Arc::new(OnceCell::new()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_server_versions() {
        assert_eq!(ServerVersion::parse("8.0.36"), Some(ServerVersion::new(8, 0)));
        assert_eq!(ServerVersion::parse("5.7.0-log"), Some(ServerVersion::new(5, 7)));
        assert_eq!(ServerVersion::parse("5.5.62-0ubuntu0.14.04.1"), Some(ServerVersion::new(5, 5)));
        assert_eq!(ServerVersion::parse("10.11.6-MariaDB"), Some(ServerVersion::new(10, 11)));
        assert_eq!(ServerVersion::parse("8"), Some(ServerVersion::new(8, 0)));
        assert_eq!(ServerVersion::parse("MySQL"), None);
        assert_eq!(ServerVersion::parse(""), None);
    }

    #[test]
    fn version_ordering_matches_gates() {
        assert!(ServerVersion::new(5, 10) > ServerVersion::new(5, 6));
        assert!(ServerVersion::new(5, 7) < ServerVersion::new(8, 0));
        assert!(ServerVersion::new(5, 0) < ServerVersion::new(5, 1));
    }

    #[test]
    fn preset_cache_is_checked() {
        let cache = CapabilityCache::with_dialect(Dialect::MysqlNative);
        let state = cache.peek();
        assert!(state.checked && state.supported);
        assert_eq!(state.dialect, Some(Dialect::MysqlNative));

        cache.reset();
        assert_eq!(cache.peek(), CapabilityState::default());
    }

    #[test]
    fn dialect_names() {
        assert_eq!(Dialect::PostgresDeclarative.to_string(), "postgres-declarative");
        assert_eq!(Dialect::MysqlPlugin.to_string(), "mysql-plugin");
        assert!(Dialect::PostgresDeclarative.is_declarative());
        assert!(!Dialect::MysqlLegacy.is_declarative());
        assert_eq!("postgres".parse::<Dialect>(), Ok(Dialect::PostgresDeclarative));
        assert_eq!("mysql".parse::<Dialect>(), Ok(Dialect::MysqlNative));
        assert_eq!("mysql-legacy".parse::<Dialect>(), Ok(Dialect::MysqlLegacy));
        assert!("oracle".parse::<Dialect>().is_err());
    }
}
