use sea_orm::DbErr;
use snafu::{Location, Snafu};

use crate::capability::Dialect;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// 服务端不支持分区
    #[snafu(display("Partitioning is unsupported on your server version"))]
    UnsupportedPartitioning {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("start year {start} must not be greater than end year {end}"))]
    InvalidRange {
        start: i32,
        end: i32,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("no calendar date for {year}-{month:02}-01"))]
    InvalidDate {
        year: i32,
        month: u32,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("invalid partition definition: {message}"))]
    InvalidDefinition {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("{strategy} partitioning cannot be expressed in the {dialect} dialect"))]
    UnsupportedStrategy {
        strategy: &'static str,
        dialect: Dialect,
        #[snafu(implicit)]
        location: Location,
    },

    /// 执行语句失败, 原样携带驱动错误
    #[snafu(display("statement failed: {statement}: {source}"))]
    StatementFailure {
        statement: String,
        source: DbErr,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to decode {what} row: {source}"))]
    RowDecode {
        what: &'static str,
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
