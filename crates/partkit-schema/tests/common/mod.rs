#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use partkit_schema::StatementExecutor;
use partkit_schema::sea_orm::{DbBackend, DbErr};
use serde_json::{Value, json};

/// 记录所有调用的执行器
pub struct RecordingExecutor {
    backend: DbBackend,
    version: String,
    plugins: Vec<Value>,
    variables: Vec<Value>,
    rows: Vec<Value>,
    fail_at: Option<usize>,
    executed: Mutex<Vec<String>>,
    queries: Mutex<Vec<String>>,
    version_calls: AtomicUsize,
}

impl RecordingExecutor {
    fn new(backend: DbBackend, version: &str) -> Self {
        Self {
            backend,
            version: version.to_owned(),
            plugins: Vec::new(),
            variables: Vec::new(),
            rows: Vec::new(),
            fail_at: None,
            executed: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
            version_calls: AtomicUsize::new(0),
        }
    }

    pub fn mysql(version: &str) -> Self {
        Self::new(DbBackend::MySql, version)
    }

    pub fn postgres() -> Self {
        Self::new(DbBackend::Postgres, "PostgreSQL 16.2")
    }

    pub fn sqlite() -> Self {
        Self::new(DbBackend::Sqlite, "3.45.0")
    }

    pub fn with_plugins(mut self, names: &[&str]) -> Self {
        self.plugins = names.iter().map(|name| json!({ "Name": name, "Status": "ACTIVE" })).collect();
        self
    }

    pub fn with_have_partitioning(mut self) -> Self {
        self.variables = vec![json!({ "Variable_name": "have_partitioning", "Value": "YES" })];
        self
    }

    pub fn with_rows(mut self, rows: Vec<Value>) -> Self {
        self.rows = rows;
        self
    }

    /// 第 `index` 条 (从 0 开始) execute 失败
    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn version_calls(&self) -> usize {
        self.version_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.executed().len() + self.queries().len() + self.version_calls()
    }
}

#[async_trait]
impl StatementExecutor for RecordingExecutor {
    fn backend(&self) -> DbBackend {
        self.backend
    }

    async fn server_version(&self) -> Result<String, DbErr> {
        self.version_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.version.clone())
    }

    async fn execute(&self, sql: &str) -> Result<(), DbErr> {
        let mut executed = self.executed.lock().unwrap();
        if self.fail_at == Some(executed.len()) {
            return Err(DbErr::Custom(format!("relation already exists: {sql}")));
        }
        executed.push(sql.to_owned());
        Ok(())
    }

    async fn query(&self, sql: &str) -> Result<Vec<Value>, DbErr> {
        self.queries.lock().unwrap().push(sql.to_owned());
        let rows = if sql.starts_with("SHOW PLUGINS") {
            &self.plugins
        } else if sql.starts_with("SHOW VARIABLES") {
            &self.variables
        } else {
            &self.rows
        };
        Ok(rows.clone())
    }
}
