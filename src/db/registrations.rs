use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use super::course_offerings::{offering_from_row, OFFERING_COLUMNS};
use super::describe_constraint;
use crate::models::Registration;

const REGISTRATION_COLUMN_COUNT: usize = 5;

fn registration_from_row(row: &Row<'_>) -> rusqlite::Result<Registration> {
    let course_offering = match row.get::<_, Option<i64>>(REGISTRATION_COLUMN_COUNT)? {
        Some(_) => Some(offering_from_row(row, REGISTRATION_COLUMN_COUNT)?),
        None => None,
    };

    Ok(Registration {
        id: row.get(0)?,
        course_offering_id: row.get(1)?,
        student_name: row.get(2)?,
        email: row.get(3)?,
        created_at: row.get(4)?,
        course_offering,
    })
}

fn registration_query(filter: &str, order: &str) -> String {
    format!(
        "SELECT r.id, r.course_offering_id, r.student_name, r.email, r.created_at,
                {OFFERING_COLUMNS}
         FROM registrations r
         LEFT JOIN course_offerings o ON o.id = r.course_offering_id
         LEFT JOIN courses c ON c.id = o.course_id
         LEFT JOIN course_types t ON t.id = o.course_type_id
         {filter}
         {order}"
    )
}

/// Registrations newest first, each with its offering and the offering's
/// course and course type.
pub fn fetch_registrations(conn: &Connection) -> Result<Vec<Registration>> {
    let sql = registration_query("", "ORDER BY r.created_at DESC, r.id DESC");
    let mut stmt = conn
        .prepare(&sql)
        .context("failed to prepare registration query")?;

    let registrations = stmt
        .query_map([], registration_from_row)
        .context("failed to load registrations")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect registrations")?;

    debug!(count = registrations.len(), "loaded registrations");
    Ok(registrations)
}

/// Enroll a student in an offering. The offering must exist.
pub fn create_registration(
    conn: &Connection,
    course_offering_id: i64,
    student_name: &str,
    email: &str,
) -> Result<Registration> {
    conn.execute(
        "INSERT INTO registrations (course_offering_id, student_name, email)
         VALUES (?1, ?2, ?3)",
        params![course_offering_id, student_name, email],
    )
    .map_err(|err| {
        describe_constraint(
            err,
            "Registration needs an existing offering, a student name and an email.",
        )
    })
    .context("failed to insert registration")?;

    let id = conn.last_insert_rowid();
    info!(id, course_offering_id, "created registration");

    let sql = registration_query("WHERE r.id = ?1", "");
    conn.query_row(&sql, params![id], registration_from_row)
        .context("failed to load registration")
}

pub fn delete_registration(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM registrations WHERE id = ?1", params![id])
        .context("failed to delete registration")?;

    if deleted == 0 {
        Err(anyhow!("Registration not found"))
    } else {
        info!(id, "deleted registration");
        Ok(())
    }
}
