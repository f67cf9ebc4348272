use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use partkit_schema::Dialect;
use partkit_schema::partition::{MaintenanceOp, PartitionDefinition, PartitionMethod};

#[derive(Parser, Debug)]
#[command(name = "partkit", version, about = "表分区 DDL 工具")]
pub struct Cli {
    #[arg(long, env = "PARTKIT_CONFIG", help = "配置文件路径")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "覆盖配置中的日志级别")]
    pub log_level: Option<String>,

    #[arg(long, requires = "dialect", help = "只打印 DDL, 不连接数据库")]
    pub dry_run: bool,

    #[arg(long, help = "指定方言, 跳过能力检测")]
    pub dialect: Option<Dialect>,

    #[command(subcommand)]
    pub command: Command,
}

/// 目标表与分区列
#[derive(Args, Debug, Clone)]
pub struct Target {
    #[arg(short, long, help = "表名, 可带 schema 前缀")]
    pub table: String,

    #[arg(short, long, help = "分区列")]
    pub column: String,
}

/// 年份区间
#[derive(Args, Debug, Clone)]
pub struct YearRange {
    #[arg(long)]
    pub start: i32,

    #[arg(long, help = "缺省为当前年份")]
    pub end: Option<i32>,

    #[arg(long, help = "分区列为 TIMESTAMP")]
    pub timestamp: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 检测服务端是否支持分区
    Check,

    /// 列出表的分区
    Show {
        #[arg(long)]
        db: String,
        #[arg(long)]
        table: String,
    },

    /// RANGE 分区, 定义形如 `p0=100`
    Range {
        #[command(flatten)]
        target: Target,
        #[arg(short, long = "partition", value_parser = parse_range, required = true)]
        partitions: Vec<PartitionDefinition>,
        #[arg(long, help = "不追加 future 分区")]
        no_future: bool,
    },

    /// LIST 分区, 定义形如 `odd=1,3,5`
    List {
        #[command(flatten)]
        target: Target,
        #[arg(short, long = "partition", value_parser = parse_list, required = true)]
        partitions: Vec<PartitionDefinition>,
    },

    Hash {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        count: u32,
    },

    /// KEY 分区, 使用主键
    Key {
        #[arg(short, long)]
        table: String,
        #[arg(long)]
        count: u32,
    },

    /// 按月份分成十二个分区
    Months {
        #[command(flatten)]
        target: Target,
    },

    Years {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        years: YearRange,
    },

    /// 按年分区并按月建子分区
    YearsMonths {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        years: YearRange,
        #[arg(long)]
        no_future: bool,
    },

    /// 创建分区父表
    CreateTable {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        column_type: String,
        #[arg(long, default_value = "RANGE")]
        method: PartitionMethod,
        #[arg(long)]
        nullable: bool,
    },

    /// 把字段改为自增
    AutoIncrement {
        #[arg(short, long)]
        table: String,
        #[arg(long, default_value = "id")]
        field: String,
        #[arg(long, default_value = "INTEGER")]
        column_type: String,
    },

    /// 分区维护
    Maintain {
        #[arg(short, long)]
        table: String,
        #[arg(long)]
        op: MaintenanceOp,
        #[arg(required = true)]
        partitions: Vec<String>,
    },
}

fn split_definition(raw: &str) -> Result<(&str, &str), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() && !value.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => Err(format!("expected `name=value`, got `{raw}`")),
    }
}

pub fn parse_range(raw: &str) -> Result<PartitionDefinition, String> {
    let (name, bound) = split_definition(raw)?;
    Ok(PartitionDefinition::range(name, bound))
}

pub fn parse_list(raw: &str) -> Result<PartitionDefinition, String> {
    let (name, values) = split_definition(raw)?;
    let values: Vec<&str> = values.split(',').map(str::trim).filter(|v| !v.is_empty()).collect();
    if values.is_empty() {
        return Err(format!("partition `{name}` has no values"));
    }
    Ok(PartitionDefinition::list(name, values))
}
