//! Binary entry point: resolve configuration, open the SQLite store and drive
//! the Ratatui event loop until the user exits.
use anyhow::Context;
use clap::Parser;
use tracing::info;

use course_manager::cli::Cli;
use course_manager::config::Config;
use course_manager::logging::init_tracing;
use course_manager::{open_database, run_app, App, Route};

/// Fatal startup problems (bad config, unwritable data directory, no terminal)
/// are returned to the shell instead of being shown in the UI.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(&cli).context("failed to load configuration")?;
    init_tracing(&config)?;

    let db_path = config.database_path()?;
    info!(path = %db_path.display(), "opening database");
    let conn = open_database(&db_path, config.busy_timeout())?;

    let route = Route::from_path(&config.start_route);
    let mut app = App::new(conn, route, config.toast_duration());
    run_app(&mut app)
}
