use serde::{Deserialize, Serialize};
use serde_with::DisplayFromStr;
pub use tracing::Level;

use crate::format::LogFormat;

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// 日志格式
    pub format: LogFormat,
    /// 日志等级
    #[serde(with = "::serde_with::As::<DisplayFromStr>")]
    pub level: Level,
    /// 额外的过滤指令, 例如 `sqlx=warn,partkit_schema=debug`
    pub directives: Option<String>,
    /// 是否显示 ANSI 颜色
    pub ansi: bool,
    /// 是否显示文件名
    pub with_filename: bool,
    /// 是否显示行号
    pub with_line_number: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Compact,
            level: Level::INFO,
            directives: None,
            ansi: true,
            with_filename: false,
            with_line_number: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_uses_defaults() {
        let conf: LogConfig = serde_json::from_str(r#"{"level": "debug", "format": "json"}"#).unwrap();
        assert_eq!(conf.level, Level::DEBUG);
        assert_eq!(conf.format, LogFormat::Json);
        assert!(conf.ansi);
        assert_eq!(conf.directives, None);
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(serde_json::from_str::<LogConfig>(r#"{"level": "loud"}"#).is_err());
    }
}
