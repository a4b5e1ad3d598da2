use anyhow::Result;
use rusqlite::Connection;

use crate::db::{create_course, delete_course, fetch_courses, rename_course};
use crate::models::Course;

use super::catalog::{CatalogEntry, CatalogView};

pub(crate) type CoursesView = CatalogView<Course>;

impl CatalogEntry for Course {
    const TITLE: &'static str = "Courses";
    const NOUN: &'static str = "course";
    const PLURAL: &'static str = "courses";
    const PLACEHOLDER: &'static str = "Enter course name";

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_all(conn: &Connection) -> Result<Vec<Self>> {
        fetch_courses(conn)
    }

    fn create(conn: &Connection, name: &str) -> Result<Self> {
        create_course(conn, name)
    }

    fn rename(conn: &Connection, id: i64, name: &str) -> Result<()> {
        rename_course(conn, id, name)
    }

    fn delete(conn: &Connection, id: i64) -> Result<()> {
        delete_course(conn, id)
    }
}
