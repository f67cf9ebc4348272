use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use partkit_schema::sea_orm::{DbBackend, DbErr};
use partkit_schema::{Dialect, StatementExecutor};
use serde_json::Value;

/// 不连接数据库, 把语句以 `;` 结尾逐条写出
pub struct PrintExecutor<W> {
    backend: DbBackend,
    out: Mutex<W>,
}

impl<W: Write + Send> PrintExecutor<W> {
    pub fn new(dialect: Dialect, out: W) -> Self {
        let backend = if dialect.is_declarative() { DbBackend::Postgres } else { DbBackend::MySql };
        Self { backend, out: Mutex::new(out) }
    }

    fn print(&self, sql: &str) -> Result<(), DbErr> {
        let mut out = self.out.lock().map_err(|e| DbErr::Custom(e.to_string()))?;
        writeln!(out, "{sql};").map_err(|e| DbErr::Custom(e.to_string()))
    }

    pub fn into_inner(self) -> Result<W, DbErr> {
        self.out.into_inner().map_err(|e| DbErr::Custom(e.to_string()))
    }
}

#[async_trait]
impl<W: Write + Send> StatementExecutor for PrintExecutor<W> {
    fn backend(&self) -> DbBackend {
        self.backend
    }

    async fn server_version(&self) -> Result<String, DbErr> {
        Err(DbErr::Custom("dry run has no server, pass --dialect".into()))
    }

    async fn execute(&self, sql: &str) -> Result<(), DbErr> {
        self.print(sql)
    }

    async fn query(&self, sql: &str) -> Result<Vec<Value>, DbErr> {
        self.print(sql)?;
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use partkit_schema::Partitioner;

    use super::*;

    #[tokio::test]
    async fn prints_statements() {
        let partitioner =
            Partitioner::with_dialect(PrintExecutor::new(Dialect::PostgresDeclarative, Vec::new()), Dialect::PostgresDeclarative);
        partitioner.partition_by_years("events", "created_at", 2021, Some(2022), false).await.unwrap();

        let out = String::from_utf8(partitioner.into_inner().into_inner().unwrap()).unwrap();
        assert_eq!(
            out,
            "CREATE TABLE events_2021 PARTITION OF events FOR VALUES FROM ('2021-01-01') TO ('2022-01-01');\n\
             CREATE TABLE events_2022 PARTITION OF events FOR VALUES FROM ('2022-01-01') TO ('2023-01-01');\n"
        );
    }

    #[tokio::test]
    async fn picks_backend_from_dialect() {
        assert_eq!(PrintExecutor::new(Dialect::MysqlNative, Vec::new()).backend(), DbBackend::MySql);
        assert_eq!(PrintExecutor::new(Dialect::PostgresDeclarative, Vec::new()).backend(), DbBackend::Postgres);
    }
}
