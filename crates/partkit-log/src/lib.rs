use std::sync::OnceLock;

use snafu::{ResultExt, Snafu};
pub use tracing;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

pub use self::config::*;
pub use self::format::*;
use crate::timer::LocalTimer;

mod config;
mod format;
mod timer;

static TRACING_APPENDER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, Snafu)]
pub enum InitError {
    #[snafu(display("invalid log directives: {directives}"))]
    Directives {
        directives: String,
        source: tracing_subscriber::filter::ParseError,
    },
    #[snafu(display("global subscriber already installed: {message}"))]
    AlreadyInstalled { message: String },
}

fn env_filter(conf: &LogConfig) -> Result<EnvFilter, InitError> {
    let directives = conf.directives.clone().unwrap_or_default();
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(conf.level).into())
        .parse(&directives)
        .context(DirectivesSnafu { directives })
}

/// 安装全局 subscriber, 日志写到标准错误, 标准输出留给命令结果
pub fn init(conf: &LogConfig) -> Result<(), InitError> {
    let filter = env_filter(conf)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());

    let sub_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(conf.with_filename)
        .with_line_number(conf.with_line_number)
        .with_ansi(conf.ansi)
        .with_timer(LocalTimer)
        .with_writer(non_blocking);

    let installed = match conf.format {
        LogFormat::Compact => sub_builder.compact().try_init(),
        LogFormat::Pretty => sub_builder.pretty().try_init(),
        LogFormat::Json => sub_builder.json().try_init(),
    };
    installed.map_err(|e| InitError::AlreadyInstalled { message: e.to_string() })?;

    // 只有第一次安装成功才会走到这里
    let _ = TRACING_APPENDER_GUARD.set(guard);
    Ok(())
}
