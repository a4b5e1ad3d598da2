use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::describe_constraint;
use crate::models::Course;

pub(crate) fn course_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        created_at: row.get(offset + 2)?,
    })
}

/// All courses ordered by name, case-insensitively.
pub fn fetch_courses(conn: &Connection) -> Result<Vec<Course>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, created_at
             FROM courses
             ORDER BY name COLLATE NOCASE, id",
        )
        .context("failed to prepare course query")?;

    let courses = stmt
        .query_map([], |row| course_from_row(row, 0))
        .context("failed to load courses")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect courses")?;

    debug!(count = courses.len(), "loaded courses");
    Ok(courses)
}

/// Look up one course by id. `None` when the row does not exist.
pub fn fetch_course(conn: &Connection, id: i64) -> Result<Option<Course>> {
    conn.query_row(
        "SELECT id, name, created_at FROM courses WHERE id = ?1",
        params![id],
        |row| course_from_row(row, 0),
    )
    .optional()
    .context("failed to load course")
}

/// Insert a course and return the stored row with its assigned id and
/// timestamp.
pub fn create_course(conn: &Connection, name: &str) -> Result<Course> {
    conn.execute("INSERT INTO courses (name) VALUES (?1)", params![name])
        .map_err(|err| describe_constraint(err, "Course name must not be blank."))
        .context("failed to insert course")?;

    let id = conn.last_insert_rowid();
    info!(id, name, "created course");
    fetch_course(conn, id)?.ok_or_else(|| anyhow!("Course vanished after insert"))
}

/// Rename a course. Offerings join by id, so they show the new name on
/// their next load. Fails when the id is unknown.
pub fn rename_course(conn: &Connection, id: i64, name: &str) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE courses SET name = ?1 WHERE id = ?2",
            params![name, id],
        )
        .map_err(|err| describe_constraint(err, "Course name must not be blank."))
        .context("failed to update course")?;

    if updated == 0 {
        return Err(anyhow!("Course not found"));
    }
    info!(id, name, "renamed course");
    Ok(())
}

/// Remove a course. Offerings pointing at it block the delete.
pub fn delete_course(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM courses WHERE id = ?1", params![id])
        .map_err(|err| describe_constraint(err, "Course is still used by course offerings."))
        .context("failed to delete course")?;

    if deleted == 0 {
        return Err(anyhow!("Course not found"));
    }
    info!(id, "deleted course");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_course_offering, create_course_type, open_in_memory};

    #[test]
    fn created_course_appears_exactly_once() {
        let conn = open_in_memory().unwrap();
        create_course(&conn, "Biology").unwrap();
        let algebra = create_course(&conn, "Algebra").unwrap();

        let courses = fetch_courses(&conn).unwrap();
        let matching: Vec<_> = courses.iter().filter(|c| c.name == "Algebra").collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].id, algebra.id);
        assert_eq!(courses[0].name, "Algebra");
    }

    #[test]
    fn rename_leaves_other_rows_alone() {
        let conn = open_in_memory().unwrap();
        let algebra = create_course(&conn, "Algebra").unwrap();
        let biology = create_course(&conn, "Biology").unwrap();

        rename_course(&conn, algebra.id, "Linear Algebra").unwrap();

        assert_eq!(fetch_course(&conn, biology.id).unwrap(), Some(biology));
        assert_eq!(
            fetch_course(&conn, algebra.id).unwrap().map(|c| c.name),
            Some("Linear Algebra".to_string())
        );
    }

    #[test]
    fn referenced_course_cannot_be_deleted() {
        let conn = open_in_memory().unwrap();
        let algebra = create_course(&conn, "Algebra").unwrap();
        let online = create_course_type(&conn, "Online").unwrap();
        create_course_offering(&conn, algebra.id, online.id).unwrap();

        let err = delete_course(&conn, algebra.id).unwrap_err();
        assert!(format!("{err:#}").contains("still used by course offerings"));
        assert_eq!(fetch_courses(&conn).unwrap().len(), 1);
    }

    #[test]
    fn deleting_a_missing_course_fails() {
        let conn = open_in_memory().unwrap();
        assert_eq!(
            delete_course(&conn, 7).unwrap_err().to_string(),
            "Course not found"
        );
    }
}
