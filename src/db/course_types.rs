use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::describe_constraint;
use crate::models::CourseType;

pub(crate) fn course_type_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<CourseType> {
    Ok(CourseType {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        created_at: row.get(offset + 2)?,
    })
}

/// Every course type, alphabetical regardless of case. This ordering feeds
/// both the Course Types list and every course type dropdown.
pub fn fetch_course_types(conn: &Connection) -> Result<Vec<CourseType>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, created_at
             FROM course_types
             ORDER BY name COLLATE NOCASE, id",
        )
        .context("failed to prepare course type query")?;

    let course_types = stmt
        .query_map([], |row| course_type_from_row(row, 0))
        .context("failed to load course types")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect course types")?;

    debug!(count = course_types.len(), "loaded course types");
    Ok(course_types)
}

/// Look up one course type by id. `None` when the row does not exist.
pub fn fetch_course_type(conn: &Connection, id: i64) -> Result<Option<CourseType>> {
    conn.query_row(
        "SELECT id, name, created_at FROM course_types WHERE id = ?1",
        params![id],
        |row| course_type_from_row(row, 0),
    )
    .optional()
    .context("failed to load course type")
}

/// Insert a course type and return the stored row, including the id and
/// timestamp the database assigned.
pub fn create_course_type(conn: &Connection, name: &str) -> Result<CourseType> {
    conn.execute(
        "INSERT INTO course_types (name) VALUES (?1)",
        params![name],
    )
    .map_err(|err| describe_constraint(err, "Course type name must not be blank."))
    .context("failed to insert course type")?;

    let id = conn.last_insert_rowid();
    info!(id, name, "created course type");
    fetch_course_type(conn, id)?.ok_or_else(|| anyhow!("Course type vanished after insert"))
}

/// Rename an existing course type. Offerings reference it by id, so they pick
/// up the new name on their next load.
pub fn rename_course_type(conn: &Connection, id: i64, name: &str) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE course_types SET name = ?1 WHERE id = ?2",
            params![name, id],
        )
        .map_err(|err| describe_constraint(err, "Course type name must not be blank."))
        .context("failed to update course type")?;

    if updated == 0 {
        Err(anyhow!("Course type not found"))
    } else {
        info!(id, name, "renamed course type");
        Ok(())
    }
}

/// Remove a course type. Fails while any offering still references it.
pub fn delete_course_type(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM course_types WHERE id = ?1", params![id])
        .map_err(|err| describe_constraint(err, "Course type is still used by course offerings."))
        .context("failed to delete course type")?;

    if deleted == 0 {
        Err(anyhow!("Course type not found"))
    } else {
        info!(id, "deleted course type");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn names(conn: &Connection) -> Vec<String> {
        fetch_course_types(conn)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect()
    }

    #[test]
    fn list_is_sorted_by_name_ignoring_case() {
        let conn = open_in_memory().unwrap();
        create_course_type(&conn, "online").unwrap();
        create_course_type(&conn, "Hybrid").unwrap();
        create_course_type(&conn, "In-Person").unwrap();

        assert_eq!(names(&conn), vec!["Hybrid", "In-Person", "online"]);
    }

    #[test]
    fn create_returns_store_assigned_fields() {
        let conn = open_in_memory().unwrap();
        let first = create_course_type(&conn, "Online").unwrap();
        let second = create_course_type(&conn, "Remote").unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.name, "Online");
        assert!(second.created_at >= first.created_at);
    }

    #[test]
    fn blank_name_is_rejected_by_the_store() {
        let conn = open_in_memory().unwrap();
        let err = create_course_type(&conn, "   ").unwrap_err();
        assert!(format!("{err:#}").contains("must not be blank"));
        assert!(names(&conn).is_empty());
    }

    #[test]
    fn rename_touches_only_the_target() {
        let conn = open_in_memory().unwrap();
        let online = create_course_type(&conn, "Online").unwrap();
        create_course_type(&conn, "In-Person").unwrap();

        rename_course_type(&conn, online.id, "Remote").unwrap();

        assert_eq!(names(&conn), vec!["In-Person", "Remote"]);
        let reloaded = fetch_course_type(&conn, online.id).unwrap().unwrap();
        assert_eq!(reloaded.created_at, online.created_at);
    }

    #[test]
    fn rename_of_missing_row_fails() {
        let conn = open_in_memory().unwrap();
        let err = rename_course_type(&conn, 42, "Remote").unwrap_err();
        assert_eq!(err.to_string(), "Course type not found");
    }

    #[test]
    fn delete_twice_reports_not_found() {
        let conn = open_in_memory().unwrap();
        let online = create_course_type(&conn, "Online").unwrap();
        create_course_type(&conn, "Hybrid").unwrap();

        delete_course_type(&conn, online.id).unwrap();
        assert!(delete_course_type(&conn, online.id).is_err());
        assert_eq!(names(&conn), vec!["Hybrid"]);
    }
}
