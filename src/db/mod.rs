//! Persistence module split across one submodule per table.

mod connection;
mod course_offerings;
mod course_types;
mod courses;
mod registrations;

use anyhow::anyhow;
use rusqlite::{Error as SqlError, ErrorCode};

pub use connection::{ensure_schema, open_database, open_in_memory, IN_MEMORY};
pub use course_offerings::{
    create_course_offering, delete_course_offering, fetch_course_offering,
    fetch_course_offerings,
};
pub use course_types::{
    create_course_type, delete_course_type, fetch_course_type, fetch_course_types,
    rename_course_type,
};
pub use courses::{create_course, delete_course, fetch_course, fetch_courses, rename_course};
pub use registrations::{create_registration, delete_registration, fetch_registrations};

/// Turn SQLite constraint violations into a sentence a person can act on.
/// Anything that is not a constraint violation passes through untouched.
pub(crate) fn describe_constraint(err: SqlError, message: &str) -> anyhow::Error {
    if matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::ConstraintViolation)
    ) {
        anyhow!("{message} ({err})")
    } else {
        err.into()
    }
}
