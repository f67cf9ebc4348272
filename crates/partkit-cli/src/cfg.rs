use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use config::{Config, Environment, File};
use log::LevelFilter;
use partkit_log::LogConfig;
use sea_orm::ConnectOptions;
use serde::{Deserialize, Serialize};
use serde_with::DisplayFromStr;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub db: DbConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DbConfig {
    /// 数据库连接字符串
    #[serde(alias = "database_url", alias = "dsn")]
    pub url: String,
    /// 数据库schema, 仅用于 postgres
    pub schema: Option<String>,
    /// 是否开启sqlx的日志
    pub sqlx_logging: bool,
    /// sqlx日志级别
    #[serde(with = "::serde_with::As::<DisplayFromStr>")]
    pub sqlx_logging_level: LevelFilter,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
    pub acquire_timeout_seconds: u64,
    /// 慢查询阈值, 毫秒
    pub slow_statement_threshold_ms: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: Default::default(),
            schema: None,
            sqlx_logging: false,
            sqlx_logging_level: LevelFilter::Debug,
            // DDL 逐条执行, 一个连接就够
            max_connections: 1,
            min_connections: 1,
            connect_timeout_seconds: 10,
            acquire_timeout_seconds: 10,
            slow_statement_threshold_ms: 5000,
        }
    }
}

impl From<DbConfig> for ConnectOptions {
    fn from(cfg: DbConfig) -> Self {
        let mut opt = Self::new(cfg.url)
            .max_connections(cfg.max_connections)
            .min_connections(cfg.min_connections)
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_seconds))
            .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_seconds))
            .sqlx_logging(cfg.sqlx_logging)
            .sqlx_logging_level(cfg.sqlx_logging_level)
            .sqlx_slow_statements_logging_settings(
                LevelFilter::Warn,
                Duration::from_millis(cfg.slow_statement_threshold_ms),
            )
            .to_owned();

        if let Some(schema) = cfg.schema {
            opt.set_schema_search_path(schema);
        }

        opt
    }
}

/// 配置文件 < `.env` < `PARTKIT__*` 环境变量, 例如 `PARTKIT__DB__URL`
pub fn load(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    // 没有 .env 文件不算错误
    let _ = dotenvy::dotenv();

    let mut builder = Config::builder();
    if let Some(path) = path {
        let path = std::fs::canonicalize(path).with_context(|| format!("canonicalize config path failed: {path:?}"))?;
        builder = builder.add_source(File::from(path));
    }
    builder = builder.add_source(Environment::with_prefix("PARTKIT").prefix_separator("__").separator("__"));

    let config = builder.build().context("config load failed")?;
    config.try_deserialize().context("config deserialize failed")
}
