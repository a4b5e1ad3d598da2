//! The four screens. Each view owns its lists and form state, talks to the
//! store only through the `db` functions, and reports every outcome through
//! [`Notifications`]. Store failures never escape a view.

mod catalog;
mod course_offerings;
mod course_types;
mod courses;
mod registrations;

use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::Frame;
use rusqlite::Connection;
use tracing::warn;

use crate::error::{Failure, Mutation};

use super::notify::Notifications;

pub(crate) use course_offerings::CourseOfferingsView;
pub(crate) use course_types::CourseTypesView;
pub(crate) use courses::CoursesView;
pub(crate) use registrations::RegistrationsView;

/// Whether a view has fetched its lists since it was mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadState {
    Loading,
    Loaded,
}

/// What the navigation shell needs from a screen.
pub(crate) trait View {
    fn load_state(&self) -> LoadState;

    /// Fetch every list the screen renders, including dropdown sources.
    fn load(&mut self, conn: &Connection, notes: &mut Notifications);

    fn handle_key(&mut self, code: KeyCode, conn: &Connection, notes: &mut Notifications);

    /// True while typed characters belong to the view (text field focused or a
    /// modal open), so the shell must not treat them as shortcuts.
    fn captures_text(&self) -> bool;

    fn draw(&self, frame: &mut Frame, area: Rect);

    fn key_hints(&self) -> Line<'static>;
}

/// Unwrap a list fetch. A failure becomes an error toast and an empty list.
pub(crate) fn rows_or_empty<T>(
    result: anyhow::Result<Vec<T>>,
    what: &'static str,
    notes: &mut Notifications,
) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(err) => {
            let failure = Failure::load(what, err);
            warn!(cause = %failure.root_cause(), "{failure}");
            notes.error(failure.to_string());
            Vec::new()
        }
    }
}

/// Report the outcome of a create/update/delete and hand back the value on
/// success. `noun` is the lowercase entity name, e.g. "course type".
pub(crate) fn report_mutation<T>(
    result: anyhow::Result<T>,
    action: Mutation,
    noun: &'static str,
    notes: &mut Notifications,
) -> Option<T> {
    match result {
        Ok(value) => {
            notes.success(format!(
                "{} {} successfully",
                capitalize(noun),
                action.past_tense()
            ));
            Some(value)
        }
        Err(err) => {
            let failure = Failure::mutation(action, noun, err);
            warn!(cause = %failure.root_cause(), "{failure}");
            notes.error(failure.to_string());
            None
        }
    }
}

/// Report a blank required field without touching the store.
pub(crate) fn report_invalid(message: String, notes: &mut Notifications) {
    notes.error(Failure::Invalid(message).to_string());
}

pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
