use sea_orm::DbBackend;
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use tracing::{debug, info};

use crate::capability::{CapabilityCache, Dialect};
use crate::error::{Result, RowDecodeSnafu, StatementFailureSnafu, UnsupportedPartitioningSnafu};
use crate::executor::StatementExecutor;
use crate::partition::{
    AlterTableDialect, CalendarBuckets, DialectStrategy, Granularity, MaintenanceOp, MaintenanceReport,
    PartitionDefinition, PartitionInfo, PartitionMethod, PartitionOfDialect, TableRef, YearSpan, render_maintenance,
};

/// 分区操作入口
///
/// 创建分区的操作都会先检测服务端是否支持分区, 再按检测到的方言渲染 DDL,
/// 最后按顺序逐条执行。多条语句之间不做回滚: 第 K 条失败时前 K-1 条已经生效。
/// 需要整体回滚时, 用 `DatabaseTransaction` 构造 [`SeaOrmExecutor`](crate::SeaOrmExecutor)。
pub struct Partitioner<E> {
    executor: E,
    capability: CapabilityCache,
}

impl<E> Partitioner<E>
where
    E: StatementExecutor,
{
    pub fn new(executor: E) -> Self {
        Self::with_capability(executor, CapabilityCache::new())
    }

    /// 与其他 `Partitioner` 共享同一份能力缓存
    pub fn with_capability(executor: E, capability: CapabilityCache) -> Self {
        Self { executor, capability }
    }

    /// 指定方言, 跳过检测
    pub fn with_dialect(executor: E, dialect: Dialect) -> Self {
        Self::with_capability(executor, CapabilityCache::with_dialect(dialect))
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn capability(&self) -> &CapabilityCache {
        &self.capability
    }

    pub fn into_inner(self) -> E {
        self.executor
    }

    /// 服务端是否支持分区, 结果会被缓存
    pub async fn have_partitioning(&self) -> Result<bool> {
        Ok(self.capability.get(&self.executor).await?.supported)
    }

    pub async fn assert_support(&self) -> Result<Dialect> {
        let state = self.capability.get(&self.executor).await?;
        match state.dialect {
            Some(dialect) if state.supported => Ok(dialect),
            _ => UnsupportedPartitioningSnafu.fail(),
        }
    }

    /// 列出 `db.table` 的分区
    pub async fn partition_names(&self, db: &str, table: &str) -> Result<Vec<PartitionInfo>> {
        let dialect = self.assert_support().await?;
        let sql = dialect.strategy().list_partitions_sql(db, table);
        self.fetch(&sql, "partition").await
    }

    /// 按范围分区
    ///
    /// 注意: 主键必须包含分区函数中用到的所有列
    pub async fn partition_by_range(
        &self,
        table: impl Into<TableRef>,
        column: &str,
        partitions: &[PartitionDefinition],
        include_future: bool,
    ) -> Result<()> {
        let table = table.into();
        let dialect = self.assert_support().await?;
        let statements = dialect.strategy().render_range(&table, column, partitions, include_future)?;
        self.apply("range", &table, dialect, statements).await
    }

    pub async fn partition_by_list(
        &self,
        table: impl Into<TableRef>,
        column: &str,
        partitions: &[PartitionDefinition],
    ) -> Result<()> {
        let table = table.into();
        let dialect = self.assert_support().await?;
        let statements = dialect.strategy().render_list(&table, column, partitions)?;
        self.apply("list", &table, dialect, statements).await
    }

    pub async fn partition_by_hash(&self, table: impl Into<TableRef>, column: &str, count: u32) -> Result<()> {
        let table = table.into();
        let dialect = self.assert_support().await?;
        let statements = dialect.strategy().render_hash(&table, column, count)?;
        self.apply("hash", &table, dialect, statements).await
    }

    /// 使用表的主键/唯一键做 KEY 分区
    pub async fn partition_by_key(&self, table: impl Into<TableRef>, count: u32) -> Result<()> {
        let table = table.into();
        let dialect = self.assert_support().await?;
        let statements = dialect.strategy().render_key(&table, count)?;
        self.apply("key", &table, dialect, statements).await
    }

    /// 按月份分成 jan..dec 十二个分区
    pub async fn partition_by_months(&self, table: impl Into<TableRef>, column: &str) -> Result<()> {
        let table = table.into();
        let dialect = self.assert_support().await?;
        let statements = dialect.strategy().render_month_of_year(&table, column)?;
        self.apply("months", &table, dialect, statements).await
    }

    /// 按年分区, `end_year` 缺省为当前年份
    pub async fn partition_by_years(
        &self,
        table: impl Into<TableRef>,
        column: &str,
        start_year: i32,
        end_year: Option<i32>,
        timestamp: bool,
    ) -> Result<()> {
        let buckets = CalendarBuckets {
            years: YearSpan::new(start_year, end_year)?,
            granularity: Granularity::Year,
            include_future: true,
            timestamp,
        };
        self.partition_by_calendar(table.into(), column, buckets).await
    }

    /// 按年分区并按月建子分区
    pub async fn partition_by_years_and_months(
        &self,
        table: impl Into<TableRef>,
        column: &str,
        start_year: i32,
        end_year: Option<i32>,
        include_future: bool,
        timestamp: bool,
    ) -> Result<()> {
        let buckets = CalendarBuckets {
            years: YearSpan::new(start_year, end_year)?,
            granularity: Granularity::YearMonth,
            include_future,
            timestamp,
        };
        self.partition_by_calendar(table.into(), column, buckets).await
    }

    async fn partition_by_calendar(&self, table: TableRef, column: &str, buckets: CalendarBuckets) -> Result<()> {
        let dialect = self.assert_support().await?;
        let statements = dialect.strategy().render_calendar_buckets(&table, column, &buckets)?;
        let operation = match buckets.granularity {
            Granularity::Year => "years",
            Granularity::YearMonth => "years-months",
        };
        self.apply(operation, &table, dialect, statements).await
    }

    /// 创建分区父表, 仅 PostgreSQL 生效
    pub async fn create_partitioned_table(
        &self,
        table: impl Into<TableRef>,
        column: &str,
        column_type: &str,
        method: PartitionMethod,
        nullable: bool,
    ) -> Result<()> {
        let table = table.into();
        let dialect = self.assert_support().await?;
        let statements = dialect.strategy().render_partitioned_table(&table, column, column_type, method, nullable)?;
        if statements.is_empty() {
            debug!(%table, %dialect, "tables are partitioned in place, nothing to create");
        }
        self.apply("create-table", &table, dialect, statements).await
    }

    /// 把字段改为自增
    pub async fn force_auto_increment(&self, table: impl Into<TableRef>, field: &str, column_type: &str) -> Result<()> {
        let table = table.into();
        let statements = self.backend_strategy().render_auto_increment(&table, field, column_type);
        info!(%table, field, "forcing auto increment");
        self.run(statements).await
    }

    /// 清空分区数据, 其余分区不受影响
    pub async fn truncate_partition_data<P: AsRef<str>>(&self, table: impl Into<TableRef>, partitions: &[P]) -> Result<()> {
        self.maintain(table, MaintenanceOp::Truncate, partitions).await.map(|_| ())
    }

    pub async fn delete_partition<P: AsRef<str>>(&self, table: impl Into<TableRef>, partitions: &[P]) -> Result<()> {
        self.maintain(table, MaintenanceOp::Drop, partitions).await.map(|_| ())
    }

    pub async fn rebuild_partitions<P: AsRef<str>>(&self, table: impl Into<TableRef>, partitions: &[P]) -> Result<()> {
        self.maintain(table, MaintenanceOp::Rebuild, partitions).await.map(|_| ())
    }

    pub async fn optimize_partitions<P: AsRef<str>>(
        &self,
        table: impl Into<TableRef>,
        partitions: &[P],
    ) -> Result<Vec<MaintenanceReport>> {
        self.maintain(table, MaintenanceOp::Optimize, partitions).await
    }

    pub async fn analyze_partitions<P: AsRef<str>>(
        &self,
        table: impl Into<TableRef>,
        partitions: &[P],
    ) -> Result<Vec<MaintenanceReport>> {
        self.maintain(table, MaintenanceOp::Analyze, partitions).await
    }

    /// 含重复键的分区通常会修复失败
    pub async fn repair_partitions<P: AsRef<str>>(
        &self,
        table: impl Into<TableRef>,
        partitions: &[P],
    ) -> Result<Vec<MaintenanceReport>> {
        self.maintain(table, MaintenanceOp::Repair, partitions).await
    }

    pub async fn check_partitions<P: AsRef<str>>(
        &self,
        table: impl Into<TableRef>,
        partitions: &[P],
    ) -> Result<Vec<MaintenanceReport>> {
        self.maintain(table, MaintenanceOp::Check, partitions).await
    }

    /// 维护操作作用于已存在的分区, 不做能力检测
    pub async fn maintain<P: AsRef<str>>(
        &self,
        table: impl Into<TableRef>,
        op: MaintenanceOp,
        partitions: &[P],
    ) -> Result<Vec<MaintenanceReport>> {
        let table = table.into();
        let sql = render_maintenance(&table, op, partitions)?;
        info!(%table, %op, partitions = partitions.len(), "partition maintenance");
        if op.returns_rows() {
            self.fetch(&sql, "maintenance").await
        } else {
            self.execute(&sql).await?;
            Ok(Vec::new())
        }
    }

    /// 已检测到的方言优先, 否则按驱动类型选择
    fn backend_strategy(&self) -> &'static dyn DialectStrategy {
        if let Some(dialect) = self.capability.peek().dialect {
            return dialect.strategy();
        }
        match self.executor.backend() {
            DbBackend::Postgres => &PartitionOfDialect,
            _ => &AlterTableDialect,
        }
    }

    async fn apply(&self, operation: &'static str, table: &TableRef, dialect: Dialect, statements: Vec<String>) -> Result<()> {
        info!(operation, %table, %dialect, statements = statements.len(), "applying partition ddl");
        self.run(statements).await
    }

    async fn run(&self, statements: Vec<String>) -> Result<()> {
        for sql in &statements {
            self.execute(sql).await?;
        }
        Ok(())
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        debug!(sql, "execute");
        self.executor.execute(sql).await.context(StatementFailureSnafu { statement: sql })
    }

    async fn fetch<T: DeserializeOwned>(&self, sql: &str, what: &'static str) -> Result<Vec<T>> {
        debug!(sql, "query");
        let rows = self.executor.query(sql).await.context(StatementFailureSnafu { statement: sql })?;
        rows.into_iter().map(|row| serde_json::from_value(row).context(RowDecodeSnafu { what })).collect()
    }
}
