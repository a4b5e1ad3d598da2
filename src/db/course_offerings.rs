use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::course_types::course_type_from_row;
use super::courses::course_from_row;
use super::describe_constraint;
use crate::models::CourseOffering;

/// Column list shared by every offering query: the offering itself, then its
/// joined course, then its joined course type. Registration queries splice the
/// same columns in after their own.
pub(crate) const OFFERING_COLUMNS: &str = "o.id, o.course_id, o.course_type_id, o.created_at,
             c.id, c.name, c.created_at,
             t.id, t.name, t.created_at";

/// Build an offering starting at `offset`. Joined rows are `None` when the
/// LEFT JOIN found nothing.
pub(crate) fn offering_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<CourseOffering> {
    let course = match row.get::<_, Option<i64>>(offset + 4)? {
        Some(_) => Some(course_from_row(row, offset + 4)?),
        None => None,
    };
    let course_type = match row.get::<_, Option<i64>>(offset + 7)? {
        Some(_) => Some(course_type_from_row(row, offset + 7)?),
        None => None,
    };

    Ok(CourseOffering {
        id: row.get(offset)?,
        course_id: row.get(offset + 1)?,
        course_type_id: row.get(offset + 2)?,
        created_at: row.get(offset + 3)?,
        course,
        course_type,
    })
}

/// Every offering in creation order, with its course and course type resolved
/// in the same query.
pub fn fetch_course_offerings(conn: &Connection) -> Result<Vec<CourseOffering>> {
    let sql = format!(
        "SELECT {OFFERING_COLUMNS}
         FROM course_offerings o
         LEFT JOIN courses c ON c.id = o.course_id
         LEFT JOIN course_types t ON t.id = o.course_type_id
         ORDER BY o.created_at, o.id"
    );
    let mut stmt = conn
        .prepare(&sql)
        .context("failed to prepare course offering query")?;

    let offerings = stmt
        .query_map([], |row| offering_from_row(row, 0))
        .context("failed to load course offerings")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect course offerings")?;

    debug!(count = offerings.len(), "loaded course offerings");
    Ok(offerings)
}

pub fn fetch_course_offering(conn: &Connection, id: i64) -> Result<Option<CourseOffering>> {
    let sql = format!(
        "SELECT {OFFERING_COLUMNS}
         FROM course_offerings o
         LEFT JOIN courses c ON c.id = o.course_id
         LEFT JOIN course_types t ON t.id = o.course_type_id
         WHERE o.id = ?1"
    );
    conn.query_row(&sql, params![id], |row| offering_from_row(row, 0))
        .optional()
        .context("failed to load course offering")
}

/// Pair a course with a course type. Both ids must exist; the foreign keys
/// reject anything else.
pub fn create_course_offering(
    conn: &Connection,
    course_id: i64,
    course_type_id: i64,
) -> Result<CourseOffering> {
    conn.execute(
        "INSERT INTO course_offerings (course_id, course_type_id) VALUES (?1, ?2)",
        params![course_id, course_type_id],
    )
    .map_err(|err| describe_constraint(err, "Course or course type does not exist."))
    .context("failed to insert course offering")?;

    let id = conn.last_insert_rowid();
    info!(id, course_id, course_type_id, "created course offering");
    fetch_course_offering(conn, id)?
        .ok_or_else(|| anyhow!("Course offering vanished after insert"))
}

/// Offerings cannot be edited, only removed. Registrations pointing at the
/// offering block the delete.
pub fn delete_course_offering(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM course_offerings WHERE id = ?1", params![id])
        .map_err(|err| describe_constraint(err, "Course offering still has registrations."))
        .context("failed to delete course offering")?;

    if deleted == 0 {
        Err(anyhow!("Course offering not found"))
    } else {
        info!(id, "deleted course offering");
        Ok(())
    }
}
