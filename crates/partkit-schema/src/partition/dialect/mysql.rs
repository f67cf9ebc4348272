use super::{CalendarBuckets, DialectStrategy, Granularity, ensure_count, ensure_future_slot, ensure_partitions};
use crate::error::Result;
use crate::partition::builder::{ClauseList, StatementBuilder, quote_literal};
use crate::partition::calendar::{Month, YearSpan};
use crate::partition::definition::{PartitionDefinition, PartitionKind, PartitionMethod, TableRef};

/// MySQL: `ALTER TABLE ... PARTITION BY ...`, 一次调用一条语句
#[derive(Copy, Clone, Debug, Default)]
pub struct AlterTableDialect;

impl AlterTableDialect {
    fn alter(table: &TableRef) -> StatementBuilder {
        StatementBuilder::new(format!("ALTER TABLE {table}"))
    }

    fn range_expr(column: &str, timestamp: bool) -> String {
        if timestamp { format!("UNIX_TIMESTAMP({column})") } else { format!("YEAR({column})") }
    }

    /// `year<Y>` 分区, 上界为下一年
    fn year_definitions(years: &YearSpan, timestamp: bool) -> Vec<PartitionDefinition> {
        years
            .years()
            .map(|year| {
                let next = year + 1;
                let bound = if timestamp {
                    format!("UNIX_TIMESTAMP('{next}-01-01 00:00:00')")
                } else {
                    next.to_string()
                };
                PartitionDefinition::range(format!("year{year}"), bound)
            })
            .collect()
    }

    fn subpartitions(suffix: &str) -> ClauseList {
        Month::hash_order().map(|month| format!("SUBPARTITION {month}{suffix}")).collect()
    }
}

impl DialectStrategy for AlterTableDialect {
    fn name(&self) -> &'static str {
        "alter-table"
    }

    fn render_range(
        &self,
        table: &TableRef,
        column: &str,
        partitions: &[PartitionDefinition],
        include_future: bool,
    ) -> Result<Vec<String>> {
        ensure_partitions(partitions)?;
        ensure_future_slot(partitions, include_future)?;
        let mut clauses = ClauseList::new();
        for partition in partitions {
            partition.validate(PartitionKind::Range)?;
            clauses.push(partition);
        }
        if include_future {
            clauses.push(PartitionDefinition::future());
        }

        let sql = Self::alter(table).push(format!("PARTITION BY RANGE({column})")).push(clauses).build();
        Ok(vec![sql])
    }

    fn render_list(&self, table: &TableRef, column: &str, partitions: &[PartitionDefinition]) -> Result<Vec<String>> {
        ensure_partitions(partitions)?;
        let mut clauses = ClauseList::new();
        for partition in partitions {
            partition.validate(PartitionKind::List)?;
            clauses.push(partition);
        }

        let sql = Self::alter(table).push(format!("PARTITION BY LIST({column})")).push(clauses).build();
        Ok(vec![sql])
    }

    fn render_hash(&self, table: &TableRef, column: &str, count: u32) -> Result<Vec<String>> {
        ensure_count(count)?;
        let sql = Self::alter(table).push(format!("PARTITION BY HASH({column})")).push(format!("PARTITIONS {count}")).build();
        Ok(vec![sql])
    }

    fn render_key(&self, table: &TableRef, count: u32) -> Result<Vec<String>> {
        ensure_count(count)?;
        let sql = Self::alter(table).push("PARTITION BY KEY()").push(format!("PARTITIONS {count}")).build();
        Ok(vec![sql])
    }

    fn render_month_of_year(&self, table: &TableRef, column: &str) -> Result<Vec<String>> {
        // `dec` 是保留字, 分区名统一加反引号
        let clauses: ClauseList = Month::calendar_order()
            .map(|month| PartitionDefinition::range(format!("`{month}`"), month.number() + 1))
            .collect();

        let sql = Self::alter(table).push(format!("PARTITION BY RANGE(MONTH({column}))")).push(clauses).build();
        Ok(vec![sql])
    }

    fn render_calendar_buckets(&self, table: &TableRef, column: &str, buckets: &CalendarBuckets) -> Result<Vec<String>> {
        let range_expr = Self::range_expr(column, buckets.timestamp);
        let partitions = Self::year_definitions(&buckets.years, buckets.timestamp);

        if buckets.granularity == Granularity::Year {
            return self.render_range(table, &range_expr, &partitions, buckets.include_future);
        }

        // 子分区名在整张表内必须唯一, 用年份作后缀
        let mut clauses = ClauseList::new();
        for (year, partition) in buckets.years.years().zip(&partitions) {
            clauses.push(format!("{partition} {}", Self::subpartitions(&year.to_string())));
        }
        if buckets.include_future {
            let future: ClauseList = Month::hash_order().map(|month| format!("SUBPARTITION `{month}`")).collect();
            clauses.push(format!("{} {future}", PartitionDefinition::future()));
        }

        let sql = Self::alter(table)
            .push(format!("PARTITION BY RANGE({range_expr})"))
            .push(format!("SUBPARTITION BY HASH(MONTH({column}))"))
            .push(clauses)
            .build();
        Ok(vec![sql])
    }

    fn render_partitioned_table(
        &self,
        _table: &TableRef,
        _column: &str,
        _column_type: &str,
        _method: PartitionMethod,
        _nullable: bool,
    ) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn render_auto_increment(&self, table: &TableRef, field: &str, column_type: &str) -> Vec<String> {
        vec![format!("ALTER TABLE {table} MODIFY {field} {column_type} NOT NULL AUTO_INCREMENT")]
    }

    fn list_partitions_sql(&self, schema: &str, table: &str) -> String {
        format!(
            "SELECT `PARTITION_NAME`, `SUBPARTITION_NAME`, `PARTITION_ORDINAL_POSITION`, `TABLE_ROWS`, `PARTITION_METHOD` \
             FROM `information_schema`.`PARTITIONS` WHERE `TABLE_SCHEMA` = {} AND `TABLE_NAME` = {}",
            quote_literal(schema),
            quote_literal(table)
        )
    }
}
