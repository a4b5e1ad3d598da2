//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. They stay plain data holders; joined rows ride along in `Option`
//! slots so list views can render names without a second query.

use std::fmt;

use chrono::{DateTime, Utc};

/// A category label for courses such as "Online" or "In-Person".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseType {
    /// Primary key assigned by the database on insert.
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for CourseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A named subject of instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    /// Primary key assigned by the database on insert.
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One course paired with one course type; the unit students register for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseOffering {
    pub id: i64,
    pub course_id: i64,
    pub course_type_id: i64,
    pub created_at: DateTime<Utc>,
    /// Joined course row. `None` when the offering was loaded without joins or
    /// the referenced row is gone.
    pub course: Option<Course>,
    /// Joined course type row, same rules as `course`.
    pub course_type: Option<CourseType>,
}

impl CourseOffering {
    /// Compose the `Course - Type` label used by dropdowns and list rows.
    /// Missing joins render as empty strings so the separator stays put.
    pub fn display_label(&self) -> String {
        let course = self.course.as_ref().map(|c| c.name.as_str()).unwrap_or("");
        let kind = self
            .course_type
            .as_ref()
            .map(|t| t.name.as_str())
            .unwrap_or("");
        format!("{course} - {kind}")
    }

    /// Whether the joined course type carries the given id. Offerings without a
    /// joined type never match.
    pub fn has_course_type(&self, type_id: i64) -> bool {
        self.course_type
            .as_ref()
            .is_some_and(|course_type| course_type.id == type_id)
    }
}

/// A student's enrollment against one course offering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub id: i64,
    pub course_offering_id: i64,
    pub student_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    /// Joined offering, itself carrying its course and course type.
    pub course_offering: Option<CourseOffering>,
}

impl Registration {
    /// `Student (email)` line shown beneath the offering label.
    pub fn student_line(&self) -> String {
        format!("{} ({})", self.student_name, self.email)
    }
}

/// Narrow offerings to those whose joined course type equals `type_id`.
/// `None` means no filter is selected and every offering is kept.
pub fn offerings_of_type(offerings: &[CourseOffering], type_id: Option<i64>) -> Vec<&CourseOffering> {
    match type_id {
        Some(id) => offerings
            .iter()
            .filter(|offering| offering.has_course_type(id))
            .collect(),
        None => offerings.iter().collect(),
    }
}
