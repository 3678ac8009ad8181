//! Console application entry point.

use std::io;
use std::process::ExitCode;

use anyhow::Context;

use equiptrack_desktop::{ConsolePresenter, DesktopConfig, bootstrap, shell};
use equiptrack_infra::SqliteSlotStore;

fn main() -> ExitCode {
    let config = DesktopConfig::from_env();
    equiptrack_observability::init(config.log_format);
    for warning in &config.warnings {
        tracing::warn!("{warning}");
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("equiptrack: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &DesktopConfig) -> anyhow::Result<()> {
    let db_path = config.resolve_db_path()?;
    let storage = SqliteSlotStore::open(&db_path)
        .with_context(|| format!("failed to open inventory database at {}", db_path.display()))?;
    tracing::info!(path = %db_path.display(), "using inventory database");

    let presenter = ConsolePresenter::new(io::stdin().lock(), io::stdout(), config.assume_yes);
    let mut app = bootstrap(config, storage, presenter)?;

    shell::run(&mut app.store, &app.changes)
}
