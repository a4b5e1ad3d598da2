use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use rusqlite::Connection;

use crate::db::{
    create_course_offering, delete_course_offering, fetch_course_offerings, fetch_course_types,
    fetch_courses,
};
use crate::error::Mutation;
use crate::models::CourseOffering;
use crate::ui::forms::{dropdown_line, Dropdown, DropdownOption};
use crate::ui::helpers::{
    clamp_selection, draw_confirm_delete, draw_placeholder, key_hints, panel_style,
    step_selection,
};
use crate::ui::notify::Notifications;

use super::{report_invalid, report_mutation, rows_or_empty, LoadState, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OfferingFocus {
    Course,
    CourseType,
    List,
}

impl OfferingFocus {
    fn next(self) -> Self {
        match self {
            OfferingFocus::Course => OfferingFocus::CourseType,
            OfferingFocus::CourseType => OfferingFocus::List,
            OfferingFocus::List => OfferingFocus::Course,
        }
    }

    fn previous(self) -> Self {
        match self {
            OfferingFocus::Course => OfferingFocus::List,
            OfferingFocus::CourseType => OfferingFocus::Course,
            OfferingFocus::List => OfferingFocus::CourseType,
        }
    }
}

/// Pairs a course with a course type. Offerings cannot be edited, so there is
/// no edit mode here: create and delete only.
pub(crate) struct CourseOfferingsView {
    pub(crate) offerings: Vec<CourseOffering>,
    pub(crate) course_choice: Dropdown,
    pub(crate) type_choice: Dropdown,
    pub(crate) load_state: LoadState,
    pub(crate) focus: OfferingFocus,
    pub(crate) selected: usize,
    pub(crate) confirm: Option<CourseOffering>,
}

impl CourseOfferingsView {
    pub(crate) fn new() -> Self {
        Self {
            offerings: Vec::new(),
            course_choice: Dropdown::new("Select Course"),
            type_choice: Dropdown::new("Select Type"),
            load_state: LoadState::Loading,
            focus: OfferingFocus::Course,
            selected: 0,
            confirm: None,
        }
    }

    /// Reload the offering list and both dropdown sources. Each fetch fails
    /// independently.
    pub(crate) fn reload(&mut self, conn: &Connection, notes: &mut Notifications) {
        let courses = rows_or_empty(fetch_courses(conn), "courses", notes);
        let course_types = rows_or_empty(fetch_course_types(conn), "course types", notes);
        self.offerings = rows_or_empty(fetch_course_offerings(conn), "course offerings", notes);

        self.course_choice.set_options(
            courses
                .into_iter()
                .map(|course| DropdownOption::new(course.id, course.name))
                .collect(),
        );
        self.type_choice.set_options(
            course_types
                .into_iter()
                .map(|course_type| DropdownOption::new(course_type.id, course_type.name))
                .collect(),
        );
        self.load_state = LoadState::Loaded;
        self.selected = clamp_selection(self.selected, self.offerings.len());
    }

    pub(crate) fn submit(&mut self, conn: &Connection, notes: &mut Notifications) -> bool {
        let (Some(course_id), Some(course_type_id)) =
            (self.course_choice.selected_id(), self.type_choice.selected_id())
        else {
            report_invalid("Select a course and a course type.".to_string(), notes);
            return false;
        };

        let created = report_mutation(
            create_course_offering(conn, course_id, course_type_id),
            Mutation::Create,
            "course offering",
            notes,
        );
        let Some(created) = created else {
            return false;
        };

        self.course_choice.clear();
        self.type_choice.clear();
        self.reload(conn, notes);
        if let Some(idx) = self.offerings.iter().position(|o| o.id == created.id) {
            self.selected = idx;
        }
        true
    }

    pub(crate) fn request_delete(&mut self) -> bool {
        self.confirm = self.offerings.get(self.selected).cloned();
        self.confirm.is_some()
    }

    pub(crate) fn confirm_delete(&mut self, conn: &Connection, notes: &mut Notifications) -> bool {
        let Some(offering) = self.confirm.take() else {
            return false;
        };
        let deleted = report_mutation(
            delete_course_offering(conn, offering.id),
            Mutation::Delete,
            "course offering",
            notes,
        )
        .is_some();
        if deleted {
            self.reload(conn, notes);
        }
        deleted
    }

    fn focused_dropdown(&mut self) -> &mut Dropdown {
        match self.focus {
            OfferingFocus::Course => &mut self.course_choice,
            _ => &mut self.type_choice,
        }
    }

    fn handle_form_key(&mut self, code: KeyCode, conn: &Connection, notes: &mut Notifications) {
        match code {
            KeyCode::Right | KeyCode::Char(' ') => self.focused_dropdown().next(),
            KeyCode::Left => self.focused_dropdown().previous(),
            KeyCode::Enter => {
                self.submit(conn, notes);
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        let len = self.offerings.len();
        match code {
            KeyCode::Up => self.selected = step_selection(self.selected, -1, len),
            KeyCode::Down => self.selected = step_selection(self.selected, 1, len),
            KeyCode::PageUp => self.selected = step_selection(self.selected, -5, len),
            KeyCode::PageDown => self.selected = step_selection(self.selected, 5, len),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = len.saturating_sub(1),
            KeyCode::Delete | KeyCode::Char('d') | KeyCode::Char('D') => {
                self.request_delete();
            }
            _ => {}
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let form_focused = self.focus != OfferingFocus::List && self.confirm.is_none();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(panel_style(form_focused))
            .title("Add Offering");

        let lines = vec![
            dropdown_line(
                "Course",
                &self.course_choice,
                form_focused && self.focus == OfferingFocus::Course,
            ),
            dropdown_line(
                "Type",
                &self.type_choice,
                form_focused && self.focus == OfferingFocus::CourseType,
            ),
            Line::from(Span::styled(
                "←/→ to choose • Enter to add offering",
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) {
        let title = format!("Course Offerings ({})", self.offerings.len());
        if self.load_state == LoadState::Loading {
            draw_placeholder(frame, area, &title, "Loading…");
            return;
        }
        if self.offerings.is_empty() {
            draw_placeholder(
                frame,
                area,
                &title,
                "No offerings yet. Pick a course and a type above.",
            );
            return;
        }

        let items: Vec<ListItem> = self
            .offerings
            .iter()
            .map(|offering| {
                let course = offering
                    .course
                    .as_ref()
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                let kind = offering
                    .course_type
                    .as_ref()
                    .map(|t| t.name.clone())
                    .unwrap_or_default();
                ListItem::new(Line::from(vec![
                    Span::styled(course, Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(" - "),
                    Span::styled(kind, Style::default().fg(Color::Gray)),
                ]))
            })
            .collect();

        let focused = self.focus == OfferingFocus::List;
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(panel_style(focused))
                    .title(title),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

impl View for CourseOfferingsView {
    fn load_state(&self) -> LoadState {
        self.load_state
    }

    fn load(&mut self, conn: &Connection, notes: &mut Notifications) {
        self.reload(conn, notes);
    }

    fn handle_key(&mut self, code: KeyCode, conn: &Connection, notes: &mut Notifications) {
        if self.confirm.is_some() {
            match code {
                KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.confirm_delete(conn, notes);
                }
                KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => self.confirm = None,
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            _ if self.focus == OfferingFocus::List => self.handle_list_key(code),
            _ => self.handle_form_key(code, conn, notes),
        }
    }

    fn captures_text(&self) -> bool {
        self.confirm.is_some()
    }

    fn draw(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(3)])
            .split(area);

        self.draw_form(frame, chunks[0]);
        self.draw_list(frame, chunks[1]);

        if let Some(offering) = &self.confirm {
            draw_confirm_delete(
                frame,
                area,
                format!("Delete offering \"{}\"?", offering.display_label()),
            );
        }
    }

    fn key_hints(&self) -> Line<'static> {
        if self.confirm.is_some() {
            return key_hints(&[("y", "Delete"), ("n/Esc", "Keep")]);
        }
        match self.focus {
            OfferingFocus::List => key_hints(&[
                ("↑↓", "Select"),
                ("d", "Delete"),
                ("Tab", "Form"),
                ("1-4", "Screens"),
                ("q", "Quit"),
            ]),
            _ => key_hints(&[
                ("←→", "Choose"),
                ("Enter", "Add"),
                ("Tab", "Next field"),
                ("1-4", "Screens"),
                ("q", "Quit"),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::db::{create_course, create_course_type, create_registration, open_in_memory};
    use crate::ui::notify::ToastKind;

    fn seeded() -> (Connection, Notifications, CourseOfferingsView) {
        let conn = open_in_memory().unwrap();
        create_course(&conn, "Algebra").unwrap();
        create_course_type(&conn, "Online").unwrap();
        let mut notes = Notifications::new(Duration::from_secs(4));
        let mut view = CourseOfferingsView::new();
        view.load(&conn, &mut notes);
        (conn, notes, view)
    }

    #[test]
    fn dropdowns_are_filled_on_load() {
        let (_conn, notes, view) = seeded();
        assert_eq!(view.load_state, LoadState::Loaded);
        assert_eq!(view.course_choice.labels().collect::<Vec<_>>(), vec!["Algebra"]);
        assert_eq!(view.type_choice.labels().collect::<Vec<_>>(), vec!["Online"]);
        assert!(notes.is_empty());
    }

    #[test]
    fn choosing_both_and_enter_creates_a_joined_offering() {
        let (conn, mut notes, mut view) = seeded();

        view.handle_key(KeyCode::Right, &conn, &mut notes);
        view.handle_key(KeyCode::Tab, &conn, &mut notes);
        view.handle_key(KeyCode::Right, &conn, &mut notes);
        view.handle_key(KeyCode::Enter, &conn, &mut notes);

        assert_eq!(view.offerings.len(), 1);
        assert_eq!(view.offerings[0].display_label(), "Algebra - Online");
        assert_eq!(view.course_choice.selected_id(), None);
        assert_eq!(view.type_choice.selected_id(), None);
        assert_eq!(
            notes.latest().unwrap().message,
            "Course offering created successfully"
        );
    }

    #[test]
    fn missing_selection_is_reported() {
        let (conn, mut notes, mut view) = seeded();
        view.course_choice.next();

        assert!(!view.submit(&conn, &mut notes));
        assert!(view.offerings.is_empty());
        assert!(view.course_choice.selected_id().is_some());
        assert_eq!(
            notes.latest().unwrap().message,
            "Select a course and a course type."
        );
    }

    #[test]
    fn offering_with_registrations_cannot_be_deleted() {
        let (conn, mut notes, mut view) = seeded();
        view.course_choice.next();
        view.type_choice.next();
        assert!(view.submit(&conn, &mut notes));
        create_registration(&conn, view.offerings[0].id, "Ana", "ana@x.com").unwrap();

        view.focus = OfferingFocus::List;
        view.handle_key(KeyCode::Char('d'), &conn, &mut notes);
        view.handle_key(KeyCode::Char('y'), &conn, &mut notes);

        assert_eq!(view.offerings.len(), 1);
        let toast = notes.latest().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Failed to delete course offering");
    }

    #[test]
    fn each_failed_fetch_is_reported_on_its_own() {
        let conn = open_in_memory().unwrap();
        let algebra = create_course(&conn, "Algebra").unwrap();
        let online = create_course_type(&conn, "Online").unwrap();
        create_course_offering(&conn, algebra.id, online.id).unwrap();
        conn.execute_batch("ALTER TABLE courses RENAME COLUMN name TO title")
            .unwrap();

        let mut notes = Notifications::new(Duration::from_secs(4));
        let mut view = CourseOfferingsView::new();
        view.load(&conn, &mut notes);

        assert_eq!(view.course_choice.len(), 0);
        assert_eq!(view.type_choice.len(), 1);
        assert!(view.offerings.is_empty());
        let messages: Vec<_> = notes.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Failed to load courses", "Failed to load course offerings"]
        );
    }
}
