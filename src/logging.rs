//! File-backed tracing setup. The terminal belongs to the UI, so log lines go
//! to a file instead of stderr.

use std::env;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "COURSE_MANAGER_LOG";

/// Pick the filter directive: `-v` forces debug, then a non-empty
/// `COURSE_MANAGER_LOG`, then the configured level.
pub fn filter_directive(config: &Config, env_value: Option<&str>) -> String {
    if config.verbose {
        return "debug".to_string();
    }
    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => config.log_level.clone(),
    }
}

/// Route `tracing` output to the log file. The terminal belongs to the UI, so
/// nothing is written to stderr.
pub fn init_tracing(config: &Config) -> Result<()> {
    let path = config.log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create log directory")?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let env_value = env::var(LOG_ENV).ok();
    let directive = filter_directive(config, env_value.as_deref());
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log filter `{directive}`"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
