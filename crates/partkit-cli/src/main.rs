use std::io::Write;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use partkit_schema::sea_orm::{ConnectOptions, ConnectionTrait, Database};
use partkit_schema::{Partitioner, SeaOrmExecutor};
use tracing::info;

use crate::cli::Cli;
use crate::dry_run::PrintExecutor;

mod cfg;
mod cli;
mod dry_run;
mod run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut conf = cfg::load(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        conf.log.level = partkit_log::Level::from_str(level).with_context(|| format!("invalid log level: {level}"))?;
    }
    partkit_log::init(&conf.log)?;

    let mut stdout = std::io::stdout();
    if cli.dry_run {
        let dialect = cli.dialect.context("--dry-run needs --dialect")?;
        let partitioner = Partitioner::with_dialect(PrintExecutor::new(dialect, std::io::stdout()), dialect);
        run::dispatch(&partitioner, cli.command, &mut stdout).await?;
        return Ok(());
    }

    anyhow::ensure!(!conf.db.url.is_empty(), "db.url is not configured (set PARTKIT__DB__URL or use --config)");
    let opts: ConnectOptions = conf.db.into();
    let db = Database::connect(opts).await.context("connect database failed")?;
    info!(backend = ?db.get_database_backend(), "connected");

    let executor = SeaOrmExecutor::new(&db);
    let partitioner = match cli.dialect {
        Some(dialect) => Partitioner::with_dialect(executor, dialect),
        None => Partitioner::new(executor),
    };
    let result = run::dispatch(&partitioner, cli.command, &mut stdout).await;
    stdout.flush()?;
    drop(partitioner);
    db.close().await?;
    result
}
