use anyhow::Result;
use rusqlite::Connection;

use crate::db::{create_course_type, delete_course_type, fetch_course_types, rename_course_type};
use crate::models::CourseType;

use super::catalog::{CatalogEntry, CatalogView};

pub(crate) type CourseTypesView = CatalogView<CourseType>;

impl CatalogEntry for CourseType {
    const TITLE: &'static str = "Course Types";
    const NOUN: &'static str = "course type";
    const PLURAL: &'static str = "course types";
    const PLACEHOLDER: &'static str = "Enter course type name";

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_all(conn: &Connection) -> Result<Vec<Self>> {
        fetch_course_types(conn)
    }

    fn create(conn: &Connection, name: &str) -> Result<Self> {
        create_course_type(conn, name)
    }

    fn rename(conn: &Connection, id: i64, name: &str) -> Result<()> {
        rename_course_type(conn, id, name)
    }

    fn delete(conn: &Connection, id: i64) -> Result<()> {
        delete_course_type(conn, id)
    }
}
