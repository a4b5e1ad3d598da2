//! Command-line flags. Every flag is optional; anything left out falls back to
//! the config file and then to built-in defaults.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Default, Parser)]
#[command(
    name = "course-manager",
    version,
    about = "Terminal UI for managing course types, courses, offerings and registrations"
)]
pub struct Cli {
    /// SQLite database file (use `:memory:` for a throwaway session)
    #[arg(long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Alternate config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Screen to open first, e.g. `/courses`
    #[arg(long, value_name = "ROUTE")]
    pub route: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}
