use serde::{Deserialize, Serialize};
use snafu::ensure;
use strum::{Display, EnumString};

use crate::error::{InvalidDefinitionSnafu, Result};
use crate::partition::definition::TableRef;

/// 针对已存在分区的维护操作
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum MaintenanceOp {
    /// 清空分区数据
    Truncate,
    /// 删除分区
    Drop,
    /// 重建分区, 等同于删除全部记录后重新插入
    Rebuild,
    /// 回收空间并整理碎片
    Optimize,
    /// 读取并保存键分布
    Analyze,
    Repair,
    Check,
}

impl MaintenanceOp {
    /// 是否返回服务端结果集
    pub fn returns_rows(self) -> bool {
        matches!(self, Self::Optimize | Self::Analyze | Self::Repair | Self::Check)
    }
}

/// `OPTIMIZE/ANALYZE/REPAIR/CHECK PARTITION` 返回的一行
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct MaintenanceReport {
    #[serde(rename = "Table")]
    pub table: String,
    #[serde(rename = "Op")]
    pub op: String,
    #[serde(rename = "Msg_type")]
    pub msg_type: String,
    #[serde(rename = "Msg_text")]
    pub msg_text: String,
}

/// `ALTER TABLE t <OP> PARTITION p1, p2, ...`
pub fn render<P: AsRef<str>>(table: &TableRef, op: MaintenanceOp, partitions: &[P]) -> Result<String> {
    ensure!(
        !partitions.is_empty(),
        InvalidDefinitionSnafu { message: format!("{op} PARTITION needs at least one partition name") }
    );
    let names: Vec<&str> = partitions.iter().map(|p| p.as_ref()).collect();
    Ok(format!("ALTER TABLE {table} {op} PARTITION {}", names.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_each_op() {
        let table = TableRef::new("events");
        let partitions = vec!["year2021".to_owned(), "year2022".to_owned()];
        let cases = [
            (MaintenanceOp::Truncate, "ALTER TABLE events TRUNCATE PARTITION year2021, year2022"),
            (MaintenanceOp::Drop, "ALTER TABLE events DROP PARTITION year2021, year2022"),
            (MaintenanceOp::Rebuild, "ALTER TABLE events REBUILD PARTITION year2021, year2022"),
            (MaintenanceOp::Optimize, "ALTER TABLE events OPTIMIZE PARTITION year2021, year2022"),
            (MaintenanceOp::Analyze, "ALTER TABLE events ANALYZE PARTITION year2021, year2022"),
            (MaintenanceOp::Repair, "ALTER TABLE events REPAIR PARTITION year2021, year2022"),
            (MaintenanceOp::Check, "ALTER TABLE events CHECK PARTITION year2021, year2022"),
        ];
        for (op, expected) in cases {
            assert_eq!(render(&table, op, &partitions).unwrap(), expected);
        }
    }

    #[test]
    fn render_requires_partitions() {
        assert!(render::<&str>(&TableRef::new("events"), MaintenanceOp::Drop, &[]).is_err());
    }

    #[test]
    fn analytical_ops_return_rows() {
        assert!(MaintenanceOp::Optimize.returns_rows());
        assert!(MaintenanceOp::Check.returns_rows());
        assert!(!MaintenanceOp::Truncate.returns_rows());
        assert!(!MaintenanceOp::Drop.returns_rows());
        assert_eq!("optimize".parse::<MaintenanceOp>(), Ok(MaintenanceOp::Optimize));
    }

    #[test]
    fn report_row_decodes() {
        let row = serde_json::json!({
            "Table": "app.events",
            "Op": "optimize",
            "Msg_type": "status",
            "Msg_text": "OK",
        });
        let report: MaintenanceReport = serde_json::from_value(row).unwrap();
        assert_eq!(report.table, "app.events");
        assert_eq!(report.msg_text, "OK");
    }
}
