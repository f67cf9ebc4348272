use std::fmt;

use snafu::ensure;
use strum::{Display, EnumString};

use crate::error::{InvalidDefinitionSnafu, Result};

/// 可带 schema 前缀的表名
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { schema: None, name: name.into() }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// 同 schema 下名为 `<name>_<suffix>` 的子表
    pub fn child(&self, suffix: impl fmt::Display) -> Self {
        Self { schema: self.schema.clone(), name: format!("{}_{}", self.name, suffix) }
    }
}

impl From<&str> for TableRef {
    fn from(value: &str) -> Self {
        match value.split_once('.') {
            Some((schema, name)) if !schema.is_empty() => Self::new(name).with_schema(schema),
            _ => Self::new(value),
        }
    }
}

impl From<String> for TableRef {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// 分区边界类型
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Display)]
pub enum PartitionKind {
    #[strum(serialize = "RANGE")]
    Range,
    #[strum(serialize = "LIST")]
    List,
}

/// `CREATE TABLE ... PARTITION BY <method>` 的分区方式
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum PartitionMethod {
    #[default]
    #[strum(serialize = "RANGE")]
    Range,
    #[strum(serialize = "LIST")]
    List,
    #[strum(serialize = "HASH")]
    Hash,
}

/// 单个分区定义
///
/// `RANGE` 分区只有一个上界表达式 (数字, 函数调用或 `MAXVALUE`),
/// `LIST` 分区是一组有序的离散值。
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PartitionDefinition {
    pub name: String,
    pub kind: PartitionKind,
    pub values: Vec<String>,
}

pub const MAXVALUE: &str = "MAXVALUE";

impl PartitionDefinition {
    pub fn range(name: impl Into<String>, bound: impl ToString) -> Self {
        Self { name: name.into(), kind: PartitionKind::Range, values: vec![bound.to_string()] }
    }

    pub fn list<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        Self { name: name.into(), kind: PartitionKind::List, values: values.into_iter().map(|v| v.to_string()).collect() }
    }

    /// 兜底分区 `future`, 上界为 `MAXVALUE`
    pub fn future() -> Self {
        Self::range("future", MAXVALUE)
    }

    /// RANGE 分区的上界
    pub fn bound(&self) -> Option<&str> {
        match self.kind {
            PartitionKind::Range => self.values.first().map(String::as_str),
            PartitionKind::List => None,
        }
    }

    pub fn validate(&self, expected: PartitionKind) -> Result<()> {
        ensure!(
            is_identifier(&self.name),
            InvalidDefinitionSnafu { message: format!("`{}` is not a valid partition name", self.name) }
        );
        ensure!(
            self.kind == expected,
            InvalidDefinitionSnafu {
                message: format!("partition {} is {} but {} partitioning was requested", self.name, self.kind, expected)
            }
        );
        ensure!(
            !self.values.is_empty() && self.values.iter().all(|v| !v.trim().is_empty()),
            InvalidDefinitionSnafu { message: format!("partition {} has an empty value", self.name) }
        );
        ensure!(
            self.kind == PartitionKind::List || self.values.len() == 1,
            InvalidDefinitionSnafu { message: format!("range partition {} takes exactly one bound", self.name) }
        );
        Ok(())
    }
}

/// `PARTITION <name> VALUES LESS THAN (<bound>)` / `PARTITION <name> VALUES IN (<v>, ...)`
impl fmt::Display for PartitionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.values.join(", ");
        match self.kind {
            PartitionKind::Range => write!(f, "PARTITION {} VALUES LESS THAN ({})", self.name, values),
            PartitionKind::List => write!(f, "PARTITION {} VALUES IN ({})", self.name, values),
        }
    }
}

/// 未加引号的标识符, 或用反引号整体包裹的标识符
pub fn is_identifier(name: &str) -> bool {
    if let Some(inner) = name.strip_prefix('`').and_then(|rest| rest.strip_suffix('`')) {
        return !inner.is_empty() && !inner.contains('`');
    }
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
