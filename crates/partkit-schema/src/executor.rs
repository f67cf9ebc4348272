use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DbBackend, DbErr, FromQueryResult, Statement};
use serde_json::Value as JsonValue;

/// 语句执行器, 分区 DDL 通过它发送到数据库
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    /// 驱动类型
    fn backend(&self) -> DbBackend;

    /// 服务端版本号, 即 `SELECT version()` 的结果
    async fn server_version(&self) -> Result<String, DbErr>;

    /// 执行一条命令型语句
    async fn execute(&self, sql: &str) -> Result<(), DbErr>;

    /// 执行一条查询语句, 每行以列名为键转换为 JSON 对象
    async fn query(&self, sql: &str) -> Result<Vec<JsonValue>, DbErr>;
}

/// 基于 SeaORM 连接的执行器
///
/// `C` 可以是 `DatabaseConnection`, 也可以是 `DatabaseTransaction`;
/// 传入事务即可让多条 `PARTITION OF` 语句在同一事务内生效。
pub struct SeaOrmExecutor<'c, C> {
    conn: &'c C,
}

impl<'c, C> SeaOrmExecutor<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &'c C {
        self.conn
    }
}

#[async_trait]
impl<C> StatementExecutor for SeaOrmExecutor<'_, C>
where
    C: ConnectionTrait + Send + Sync,
{
    fn backend(&self) -> DbBackend {
        self.conn.get_database_backend()
    }

    async fn server_version(&self) -> Result<String, DbErr> {
        let stmt = Statement::from_string(self.backend(), "SELECT version()");
        let row = self
            .conn
            .query_one(stmt)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("SELECT version() returned no rows".to_owned()))?;
        row.try_get_by_index::<String>(0)
    }

    async fn execute(&self, sql: &str) -> Result<(), DbErr> {
        self.conn.execute_unprepared(sql).await?;
        Ok(())
    }

    async fn query(&self, sql: &str) -> Result<Vec<JsonValue>, DbErr> {
        let stmt = Statement::from_string(self.backend(), sql);
        let rows = self.conn.query_all(stmt).await?;
        rows.iter().map(|row| JsonValue::from_query_result(row, "")).collect()
    }
}
