use snafu::ensure;

use crate::error::{InvalidDefinitionSnafu, Result};
use crate::partition::calendar::YearSpan;
use crate::partition::definition::{MAXVALUE, PartitionDefinition, PartitionMethod, TableRef};

mod mysql;
mod postgres;

pub use mysql::*;
pub use postgres::*;

/// 日历分桶粒度
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Granularity {
    /// 每年一个分区
    Year,
    /// 每年一个分区, 再按月细分
    YearMonth,
}

/// 按年 (可再按月) 分桶的请求
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CalendarBuckets {
    pub years: YearSpan,
    pub granularity: Granularity,
    /// 追加 `future` 兜底分区, 声明式方言忽略该选项
    pub include_future: bool,
    /// 分区列是 Unix 时间戳而非日期
    pub timestamp: bool,
}

/// 一种分区 DDL 语法的渲染规则
///
/// 所有方法都是纯函数, 返回按执行顺序排列的语句。
pub trait DialectStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn render_range(
        &self,
        table: &TableRef,
        column: &str,
        partitions: &[PartitionDefinition],
        include_future: bool,
    ) -> Result<Vec<String>>;

    fn render_list(&self, table: &TableRef, column: &str, partitions: &[PartitionDefinition]) -> Result<Vec<String>>;

    fn render_hash(&self, table: &TableRef, column: &str, count: u32) -> Result<Vec<String>>;

    fn render_key(&self, table: &TableRef, count: u32) -> Result<Vec<String>>;

    /// 按一年中的月份分成十二个分区
    fn render_month_of_year(&self, table: &TableRef, column: &str) -> Result<Vec<String>>;

    fn render_calendar_buckets(&self, table: &TableRef, column: &str, buckets: &CalendarBuckets) -> Result<Vec<String>>;

    /// 创建分区父表; 原地分区的方言返回空
    fn render_partitioned_table(
        &self,
        table: &TableRef,
        column: &str,
        column_type: &str,
        method: PartitionMethod,
        nullable: bool,
    ) -> Result<Vec<String>>;

    fn render_auto_increment(&self, table: &TableRef, field: &str, column_type: &str) -> Vec<String>;

    /// 查询分区元数据, 投影为 [`PartitionInfo`](crate::partition::PartitionInfo) 的列名
    fn list_partitions_sql(&self, schema: &str, table: &str) -> String;
}

pub(crate) fn ensure_count(count: u32) -> Result<()> {
    ensure!(count > 0, InvalidDefinitionSnafu { message: "partition count must be greater than zero" });
    Ok(())
}

pub(crate) fn ensure_partitions(partitions: &[PartitionDefinition]) -> Result<()> {
    ensure!(!partitions.is_empty(), InvalidDefinitionSnafu { message: "at least one partition definition is required" });
    Ok(())
}

/// 追加 `future` 分区时, 显式分区不能占用其名字, 也不能以 `MAXVALUE` 为上界
pub(crate) fn ensure_future_slot(partitions: &[PartitionDefinition], include_future: bool) -> Result<()> {
    if !include_future {
        return Ok(());
    }
    let future = PartitionDefinition::future();
    for partition in partitions {
        ensure!(
            partition.name.trim_matches('`') != future.name,
            InvalidDefinitionSnafu { message: format!("partition name `{}` is reserved for the future partition", future.name) }
        );
        ensure!(
            !partition.bound().is_some_and(|bound| bound.trim().eq_ignore_ascii_case(MAXVALUE)),
            InvalidDefinitionSnafu {
                message: format!("partition {} is bounded by MAXVALUE, nothing is left for the future partition", partition.name)
            }
        );
    }
    Ok(())
}
