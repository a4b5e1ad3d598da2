//! Optional TOML configuration layered under the CLI flags.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::ConfigError;

const APPLICATION: &str = "course-manager";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "courses.sqlite";
const LOG_FILE_NAME: &str = "course-manager.log";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database file; defaults to the platform data directory.
    pub database_path: Option<PathBuf>,
    /// Route opened at startup.
    pub start_route: String,
    /// How long a toast stays in the footer.
    pub toast_seconds: u64,
    /// How long SQLite waits on a locked database before failing.
    pub busy_timeout_ms: u64,
    /// Log destination; defaults next to the database.
    pub log_file: Option<PathBuf>,
    /// `tracing` filter directive used when `COURSE_MANAGER_LOG` is unset.
    pub log_level: String,
    /// Set by `-v`; forces debug logging over the environment and the file.
    #[serde(skip)]
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            start_route: "/".to_string(),
            toast_seconds: 4,
            busy_timeout_ms: 2000,
            log_file: None,
            log_level: "info".to_string(),
            verbose: false,
        }
    }
}

impl Config {
    /// Read a config file. A missing file yields the defaults; an unreadable or
    /// malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the file named by `--config` (or the platform default) and apply
    /// the remaining CLI flags on top.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => match default_config_path() {
                Some(path) => Self::load(&path)?,
                None => Self::default(),
            },
        };
        config.apply_cli(cli);
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(path) = &cli.database {
            self.database_path = Some(path.clone());
        }
        if let Some(route) = &cli.route {
            self.start_route = route.clone();
        }
        if cli.verbose {
            self.log_level = "debug".to_string();
            self.verbose = true;
        }
    }

    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(DB_FILE_NAME)),
        }
    }

    pub fn log_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(LOG_FILE_NAME)),
        }
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.toast_seconds)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APPLICATION)
}

/// `<config dir>/course-manager/config.toml`, when the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn data_dir() -> Result<PathBuf, ConfigError> {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(ConfigError::NoDataDir)
}
