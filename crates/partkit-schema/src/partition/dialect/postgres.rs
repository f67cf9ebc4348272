use std::fmt;

use chrono::NaiveDate;

use super::{CalendarBuckets, DialectStrategy, Granularity, ensure_count, ensure_future_slot, ensure_partitions};
use crate::capability::Dialect;
use crate::error::{Result, UnsupportedStrategySnafu};
use crate::partition::builder::{ClauseList, StatementBuilder, quote_literal};
use crate::partition::calendar::{Month, month_bounds, year_bounds};
use crate::partition::definition::{MAXVALUE, PartitionDefinition, PartitionKind, PartitionMethod, TableRef};

/// `PARTITION OF` 子表的取值范围
#[derive(Debug, Clone)]
enum ForValues {
    Range { start: String, end: String },
    List { values: Vec<String> },
    Hash { modulus: u32, remainder: u32 },
}

impl ForValues {
    fn dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self::Range {
            start: quote_literal(&start.format("%Y-%m-%d").to_string()),
            end: quote_literal(&end.format("%Y-%m-%d").to_string()),
        }
    }
}

impl fmt::Display for ForValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForValues::Range { start, end } => write!(f, "FOR VALUES FROM ({start}) TO ({end})"),
            ForValues::List { values } => write!(f, "FOR VALUES IN {}", values.iter().collect::<ClauseList>()),
            ForValues::Hash { modulus, remainder } => {
                write!(f, "FOR VALUES WITH (MODULUS {modulus}, REMAINDER {remainder})")
            }
        }
    }
}

/// PostgreSQL 声明式分区: 每个分区一条 `CREATE TABLE ... PARTITION OF ...`
#[derive(Copy, Clone, Debug, Default)]
pub struct PartitionOfDialect;

impl PartitionOfDialect {
    fn partition_of(partition: &TableRef, parent: &TableRef, values: ForValues) -> String {
        StatementBuilder::new(format!("CREATE TABLE {partition}"))
            .push(format!("PARTITION OF {parent}"))
            .push(values)
            .build()
    }

    /// 反引号只在 MySQL 中有效
    fn child_name(definition: &PartitionDefinition) -> &str {
        definition.name.trim_matches('`')
    }
}

impl DialectStrategy for PartitionOfDialect {
    fn name(&self) -> &'static str {
        "partition-of"
    }

    fn render_range(
        &self,
        table: &TableRef,
        _column: &str,
        partitions: &[PartitionDefinition],
        include_future: bool,
    ) -> Result<Vec<String>> {
        ensure_partitions(partitions)?;
        ensure_future_slot(partitions, include_future)?;
        let mut statements = Vec::with_capacity(partitions.len() + 1);
        let mut lower = "MINVALUE".to_owned();
        for partition in partitions {
            partition.validate(PartitionKind::Range)?;
            let upper = partition.bound().unwrap_or(MAXVALUE).to_owned();
            let values = ForValues::Range { start: lower, end: upper.clone() };
            statements.push(Self::partition_of(&table.child(Self::child_name(partition)), table, values));
            lower = upper;
        }
        if include_future {
            let values = ForValues::Range { start: lower, end: MAXVALUE.to_owned() };
            statements.push(Self::partition_of(&table.child("future"), table, values));
        }
        Ok(statements)
    }

    fn render_list(&self, table: &TableRef, _column: &str, partitions: &[PartitionDefinition]) -> Result<Vec<String>> {
        ensure_partitions(partitions)?;
        partitions
            .iter()
            .map(|partition| {
                partition.validate(PartitionKind::List)?;
                let values = ForValues::List { values: partition.values.clone() };
                Ok(Self::partition_of(&table.child(Self::child_name(partition)), table, values))
            })
            .collect()
    }

    fn render_hash(&self, table: &TableRef, _column: &str, count: u32) -> Result<Vec<String>> {
        ensure_count(count)?;
        Ok((0..count)
            .map(|remainder| {
                let values = ForValues::Hash { modulus: count, remainder };
                Self::partition_of(&table.child(format!("p{remainder}")), table, values)
            })
            .collect())
    }

    fn render_key(&self, _table: &TableRef, _count: u32) -> Result<Vec<String>> {
        UnsupportedStrategySnafu { strategy: "KEY", dialect: Dialect::PostgresDeclarative }.fail()
    }

    /// 父表需按 `RANGE (EXTRACT(MONTH FROM col))` 分区
    fn render_month_of_year(&self, table: &TableRef, _column: &str) -> Result<Vec<String>> {
        Ok(Month::calendar_order()
            .map(|month| {
                let values = ForValues::Range { start: month.number().to_string(), end: (month.number() + 1).to_string() };
                Self::partition_of(&table.child(month), table, values)
            })
            .collect())
    }

    fn render_calendar_buckets(&self, table: &TableRef, _column: &str, buckets: &CalendarBuckets) -> Result<Vec<String>> {
        let mut statements = Vec::new();
        for year in buckets.years.years() {
            match buckets.granularity {
                Granularity::Year => {
                    let (start, end) = year_bounds(year)?;
                    statements.push(Self::partition_of(&table.child(year), table, ForValues::dates(start, end)));
                }
                Granularity::YearMonth => {
                    for month in Month::calendar_order() {
                        let (start, end) = month_bounds(year, month)?;
                        let child = table.child(format!("{month}{year}"));
                        statements.push(Self::partition_of(&child, table, ForValues::dates(start, end)));
                    }
                }
            }
        }
        Ok(statements)
    }

    fn render_partitioned_table(
        &self,
        table: &TableRef,
        column: &str,
        column_type: &str,
        method: PartitionMethod,
        nullable: bool,
    ) -> Result<Vec<String>> {
        let column_def = StatementBuilder::new(column).push(column_type).push_if(!nullable, "NOT NULL").build();
        let sql = StatementBuilder::new(format!("CREATE TABLE {table} ({column_def})"))
            .push(format!("PARTITION BY {method} ({column})"))
            .build();
        Ok(vec![sql])
    }

    fn render_auto_increment(&self, table: &TableRef, field: &str, _column_type: &str) -> Vec<String> {
        let sequence = table.child(format!("{field}_seq"));
        let regclass = quote_literal(&sequence.to_string());
        vec![
            format!("CREATE SEQUENCE IF NOT EXISTS {sequence}"),
            format!("SELECT SETVAL({regclass}, (SELECT max({field}) FROM {table}))"),
            format!("ALTER TABLE {table} ALTER COLUMN {field} SET DEFAULT nextval({regclass}::regclass)"),
            format!("ALTER SEQUENCE {sequence} OWNED BY {table}.{field}"),
        ]
    }

    fn list_partitions_sql(&self, schema: &str, table: &str) -> String {
        format!(
            r#"
            SELECT child.relname AS "PARTITION_NAME",
                   NULL::text AS "SUBPARTITION_NAME",
                   ROW_NUMBER() OVER (ORDER BY child.relname) AS "PARTITION_ORDINAL_POSITION",
                   child.reltuples::bigint AS "TABLE_ROWS",
                   CASE pt.partstrat WHEN 'r' THEN 'RANGE' WHEN 'l' THEN 'LIST' WHEN 'h' THEN 'HASH' END AS "PARTITION_METHOD"
            FROM pg_inherits
            JOIN pg_class parent ON pg_inherits.inhparent = parent.oid
            JOIN pg_class child ON pg_inherits.inhrelid = child.oid
            JOIN pg_namespace ns ON parent.relnamespace = ns.oid
            LEFT JOIN pg_partitioned_table pt ON pt.partrelid = parent.oid
            WHERE ns.nspname = {schema} AND parent.relname = {table}
            ORDER BY child.relname
            "#,
            schema = quote_literal(schema),
            table = quote_literal(table),
        )
    }
}
