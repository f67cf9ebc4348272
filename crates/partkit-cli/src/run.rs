use std::io::Write;

use partkit_schema::{Partitioner, StatementExecutor};
use serde::Serialize;
use tracing::info;

use crate::cli::Command;

fn print_rows<T: Serialize>(rows: &[T], out: &mut impl Write) -> anyhow::Result<()> {
    for row in rows {
        writeln!(out, "{}", serde_json::to_string(row)?)?;
    }
    Ok(())
}

/// 执行一条子命令, 结果行以 JSON Lines 写到 `out`
pub async fn dispatch<E: StatementExecutor>(
    partitioner: &Partitioner<E>,
    command: Command,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Check => {
            let supported = partitioner.have_partitioning().await?;
            let state = partitioner.capability().peek();
            let dialect = state.dialect.map(|d| d.to_string()).unwrap_or_else(|| "none".into());
            writeln!(out, "supported={supported} dialect={dialect}")?;
        }
        Command::Show { db, table } => {
            let partitions = partitioner.partition_names(&db, &table).await?;
            print_rows(&partitions, out)?;
        }
        Command::Range { target, partitions, no_future } => {
            partitioner.partition_by_range(target.table, &target.column, &partitions, !no_future).await?;
        }
        Command::List { target, partitions } => {
            partitioner.partition_by_list(target.table, &target.column, &partitions).await?;
        }
        Command::Hash { target, count } => {
            partitioner.partition_by_hash(target.table, &target.column, count).await?;
        }
        Command::Key { table, count } => {
            partitioner.partition_by_key(table, count).await?;
        }
        Command::Months { target } => {
            partitioner.partition_by_months(target.table, &target.column).await?;
        }
        Command::Years { target, years } => {
            partitioner
                .partition_by_years(target.table, &target.column, years.start, years.end, years.timestamp)
                .await?;
        }
        Command::YearsMonths { target, years, no_future } => {
            partitioner
                .partition_by_years_and_months(
                    target.table,
                    &target.column,
                    years.start,
                    years.end,
                    !no_future,
                    years.timestamp,
                )
                .await?;
        }
        Command::CreateTable { target, column_type, method, nullable } => {
            partitioner.create_partitioned_table(target.table, &target.column, &column_type, method, nullable).await?;
        }
        Command::AutoIncrement { table, field, column_type } => {
            partitioner.force_auto_increment(table, &field, &column_type).await?;
        }
        Command::Maintain { table, op, partitions } => {
            let reports = partitioner.maintain(table, op, &partitions).await?;
            print_rows(&reports, out)?;
        }
    }
    info!("done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use partkit_schema::Dialect;

    use super::*;
    use crate::cli::Cli;
    use crate::dry_run::PrintExecutor;

    async fn render(dialect: Dialect, args: &[&str]) -> String {
        let cli = Cli::try_parse_from(args).unwrap();
        let partitioner = Partitioner::with_dialect(PrintExecutor::new(dialect, Vec::new()), dialect);
        let mut summary = Vec::new();
        dispatch(&partitioner, cli.command, &mut summary).await.unwrap();
        String::from_utf8(partitioner.into_inner().into_inner().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn range_with_future() {
        let sql = render(
            Dialect::MysqlNative,
            &["partkit", "range", "-t", "events", "-c", "id", "-p", "p0=100", "-p", "p1=200"],
        )
        .await;
        assert_eq!(
            sql,
            "ALTER TABLE events PARTITION BY RANGE(id) (PARTITION p0 VALUES LESS THAN (100), \
             PARTITION p1 VALUES LESS THAN (200), PARTITION future VALUES LESS THAN (MAXVALUE));\n"
        );
    }

    #[tokio::test]
    async fn hash_on_postgres() {
        let sql = render(Dialect::PostgresDeclarative, &["partkit", "hash", "-t", "events", "-c", "id", "--count", "2"]).await;
        assert_eq!(sql.lines().count(), 2);
        assert!(sql.contains("FOR VALUES WITH (MODULUS 2, REMAINDER 1);"));
    }

    #[tokio::test]
    async fn maintenance_is_rendered() {
        let sql = render(Dialect::MysqlNative, &["partkit", "maintain", "-t", "events", "--op", "drop", "year2021"]).await;
        assert_eq!(sql, "ALTER TABLE events DROP PARTITION year2021;\n");
    }

    #[tokio::test]
    async fn check_reports_dialect() {
        let cli = Cli::try_parse_from(["partkit", "check"]).unwrap();
        let partitioner =
            Partitioner::with_dialect(PrintExecutor::new(Dialect::MysqlPlugin, Vec::new()), Dialect::MysqlPlugin);
        let mut out = Vec::new();
        dispatch(&partitioner, cli.command, &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "supported=true dialect=mysql-plugin\n");
    }
}
