use serde::{Deserialize, Serialize};

/// 分区元数据中的一行
///
/// MySQL 读取 `information_schema.PARTITIONS`, PostgreSQL 读取 `pg_inherits`,
/// 两边的查询都投影成同样的列名。
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct PartitionInfo {
    #[serde(rename = "PARTITION_NAME")]
    pub partition_name: Option<String>,
    #[serde(rename = "SUBPARTITION_NAME")]
    pub subpartition_name: Option<String>,
    #[serde(rename = "PARTITION_ORDINAL_POSITION")]
    pub ordinal_position: Option<u64>,
    #[serde(rename = "TABLE_ROWS")]
    pub row_estimate: Option<i64>,
    #[serde(rename = "PARTITION_METHOD")]
    pub partition_method: Option<String>,
}
