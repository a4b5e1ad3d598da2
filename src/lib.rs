//! Core library surface for the Course Manager TUI.
//!
//! The binary only wires these pieces together; tests and other tooling can
//! reuse the store functions and the app shell directly.
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

/// Persistence entry points used at startup.
pub use db::{ensure_schema, open_database, open_in_memory};

pub use models::{Course, CourseOffering, CourseType, Registration};

/// The interactive application entry point and state container.
pub use ui::{run_app, App, Route};
