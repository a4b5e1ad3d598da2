use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use rusqlite::Connection;

use crate::db::{
    create_registration, delete_registration, fetch_course_offerings, fetch_course_types,
    fetch_registrations,
};
use crate::error::Mutation;
use crate::models::{offerings_of_type, CourseOffering, Registration};
use crate::ui::forms::{dropdown_line, field_line, Dropdown, DropdownOption, TextInput};
use crate::ui::helpers::{
    clamp_selection, draw_confirm_delete, draw_placeholder, key_hints, panel_style,
    step_selection, text_cursor_x,
};
use crate::ui::notify::Notifications;

use super::{report_invalid, report_mutation, rows_or_empty, LoadState, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RegistrationFocus {
    Filter,
    Offering,
    StudentName,
    Email,
    List,
}

impl RegistrationFocus {
    const RING: [RegistrationFocus; 5] = [
        RegistrationFocus::Filter,
        RegistrationFocus::Offering,
        RegistrationFocus::StudentName,
        RegistrationFocus::Email,
        RegistrationFocus::List,
    ];

    fn position(self) -> usize {
        Self::RING.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::RING[(self.position() + 1) % Self::RING.len()]
    }

    fn previous(self) -> Self {
        Self::RING[(self.position() + Self::RING.len() - 1) % Self::RING.len()]
    }

    fn is_text(self) -> bool {
        matches!(self, RegistrationFocus::StudentName | RegistrationFocus::Email)
    }
}

/// Enrolls students into offerings. The course type filter only narrows the
/// offering dropdown; the registration list itself is never filtered.
pub(crate) struct RegistrationsView {
    pub(crate) registrations: Vec<Registration>,
    pub(crate) offerings: Vec<CourseOffering>,
    pub(crate) type_filter: Dropdown,
    pub(crate) offering_choice: Dropdown,
    pub(crate) student_name: TextInput,
    pub(crate) email: TextInput,
    pub(crate) load_state: LoadState,
    pub(crate) focus: RegistrationFocus,
    pub(crate) selected: usize,
    pub(crate) confirm: Option<Registration>,
}

impl RegistrationsView {
    pub(crate) fn new() -> Self {
        Self {
            registrations: Vec::new(),
            offerings: Vec::new(),
            type_filter: Dropdown::new("All Course Types"),
            offering_choice: Dropdown::new("Select Course"),
            student_name: TextInput::default(),
            email: TextInput::default(),
            load_state: LoadState::Loading,
            focus: RegistrationFocus::Filter,
            selected: 0,
            confirm: None,
        }
    }

    pub(crate) fn reload(&mut self, conn: &Connection, notes: &mut Notifications) {
        let course_types = rows_or_empty(fetch_course_types(conn), "course types", notes);
        self.offerings = rows_or_empty(fetch_course_offerings(conn), "course offerings", notes);
        self.registrations = rows_or_empty(fetch_registrations(conn), "registrations", notes);

        self.type_filter.set_options(
            course_types
                .into_iter()
                .map(|course_type| DropdownOption::new(course_type.id, course_type.name))
                .collect(),
        );
        self.refresh_offering_choices();
        self.load_state = LoadState::Loaded;
        self.selected = clamp_selection(self.selected, self.registrations.len());
    }

    /// Offerings matching the current filter, in list order.
    pub(crate) fn visible_offerings(&self) -> Vec<&CourseOffering> {
        offerings_of_type(&self.offerings, self.type_filter.selected_id())
    }

    /// Rebuild the offering dropdown from the filter. A selected offering that
    /// the filter hides is dropped.
    fn refresh_offering_choices(&mut self) {
        let options = self
            .visible_offerings()
            .into_iter()
            .map(|offering| DropdownOption::new(offering.id, offering.display_label()))
            .collect();
        self.offering_choice.set_options(options);
    }

    pub(crate) fn submit(&mut self, conn: &Connection, notes: &mut Notifications) -> bool {
        let Some(offering_id) = self.offering_choice.selected_id() else {
            report_invalid("Select a course offering.".to_string(), notes);
            return false;
        };
        let Some(student_name) = self.student_name.required() else {
            report_invalid("Student name is required.".to_string(), notes);
            return false;
        };
        let Some(email) = self.email.required() else {
            report_invalid("Email is required.".to_string(), notes);
            return false;
        };

        let created = report_mutation(
            create_registration(conn, offering_id, &student_name, &email),
            Mutation::Create,
            "registration",
            notes,
        );
        let Some(created) = created else {
            return false;
        };

        self.offering_choice.clear();
        self.student_name.clear();
        self.email.clear();
        self.reload(conn, notes);
        if let Some(idx) = self.registrations.iter().position(|r| r.id == created.id) {
            self.selected = idx;
        }
        true
    }

    pub(crate) fn request_delete(&mut self) -> bool {
        self.confirm = self.registrations.get(self.selected).cloned();
        self.confirm.is_some()
    }

    pub(crate) fn confirm_delete(&mut self, conn: &Connection, notes: &mut Notifications) -> bool {
        let Some(registration) = self.confirm.take() else {
            return false;
        };
        let deleted = report_mutation(
            delete_registration(conn, registration.id),
            Mutation::Delete,
            "registration",
            notes,
        )
        .is_some();
        if deleted {
            self.reload(conn, notes);
        }
        deleted
    }

    fn cycle_dropdown(&mut self, forward: bool) {
        match self.focus {
            RegistrationFocus::Filter => {
                if forward {
                    self.type_filter.next();
                } else {
                    self.type_filter.previous();
                }
                self.refresh_offering_choices();
            }
            RegistrationFocus::Offering => {
                if forward {
                    self.offering_choice.next();
                } else {
                    self.offering_choice.previous();
                }
            }
            _ => {}
        }
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            RegistrationFocus::StudentName => Some(&mut self.student_name),
            RegistrationFocus::Email => Some(&mut self.email),
            _ => None,
        }
    }

    fn handle_form_key(&mut self, code: KeyCode, conn: &Connection, notes: &mut Notifications) {
        match code {
            KeyCode::Enter => {
                self.submit(conn, notes);
            }
            KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::Right if !self.focus.is_text() => self.cycle_dropdown(true),
            KeyCode::Left if !self.focus.is_text() => self.cycle_dropdown(false),
            KeyCode::Char(' ') if !self.focus.is_text() => self.cycle_dropdown(true),
            KeyCode::Backspace => {
                if let Some(input) = self.focused_input() {
                    input.backspace();
                }
            }
            KeyCode::Char(ch) => {
                if let Some(input) = self.focused_input() {
                    input.push_char(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        let len = self.registrations.len();
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
        let form_focused = self.focus != RegistrationFocus::List && self.confirm.is_none();
        let active = |field: RegistrationFocus| form_focused && self.focus == field;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(panel_style(form_focused))
            .title("Register Student");
        let inner = block.inner(area);

        let visible = self.offering_choice.len();
        let lines = vec![
            dropdown_line("Filter", &self.type_filter, active(RegistrationFocus::Filter)),
            dropdown_line(
                "Offering",
                &self.offering_choice,
                active(RegistrationFocus::Offering),
            ),
            field_line(
                "Student",
                self.student_name.value(),
                "Enter student name",
                active(RegistrationFocus::StudentName),
            ),
            field_line(
                "Email",
                self.email.value(),
                "Enter email",
                active(RegistrationFocus::Email),
            ),
            Line::from(Span::styled(
                format!(
                    "{visible} of {} offerings shown • Enter to register",
                    self.offerings.len()
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if form_focused {
            let cursor = match self.focus {
                RegistrationFocus::StudentName => {
                    Some(("Student: ".len(), 2, self.student_name.char_len()))
                }
                RegistrationFocus::Email => Some(("Email: ".len(), 3, self.email.char_len())),
                _ => None,
            };
            if let Some((prefix, row, len)) = cursor {
                let x = text_cursor_x(inner, prefix, len);
                frame.set_cursor_position((x, inner.y.saturating_add(row)));
            }
        }
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) {
        let title = format!("Registrations ({})", self.registrations.len());
        if self.load_state == LoadState::Loading {
            draw_placeholder(frame, area, &title, "Loading…");
            return;
        }
        if self.registrations.is_empty() {
            draw_placeholder(frame, area, &title, "No registrations yet.");
            return;
        }

        let items: Vec<ListItem> = self
            .registrations
            .iter()
            .map(|registration| {
                let offering = registration
                    .course_offering
                    .as_ref()
                    .map(CourseOffering::display_label)
                    .unwrap_or_default();
                ListItem::new(vec![
                    Line::from(Span::styled(
                        offering,
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("  {}", registration.student_line()),
                        Style::default().fg(Color::Gray),
                    )),
                ])
            })
            .collect();

        let focused = self.focus == RegistrationFocus::List;
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

impl View for RegistrationsView {
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
            KeyCode::Esc if self.focus != RegistrationFocus::List => {
                self.focus = RegistrationFocus::List;
            }
            _ if self.focus == RegistrationFocus::List => self.handle_list_key(code),
            _ => self.handle_form_key(code, conn, notes),
        }
    }

    fn captures_text(&self) -> bool {
        self.confirm.is_some() || self.focus.is_text()
    }

    fn draw(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(3)])
            .split(area);

        self.draw_form(frame, chunks[0]);
        self.draw_list(frame, chunks[1]);

        if let Some(registration) = &self.confirm {
            draw_confirm_delete(
                frame,
                area,
                format!("Delete registration for \"{}\"?", registration.student_name),
            );
        }
    }

    fn key_hints(&self) -> Line<'static> {
        if self.confirm.is_some() {
            return key_hints(&[("y", "Delete"), ("n/Esc", "Keep")]);
        }
        match self.focus {
            RegistrationFocus::List => key_hints(&[
                ("↑↓", "Select"),
                ("d", "Delete"),
                ("Tab", "Form"),
                ("1-4", "Screens"),
                ("q", "Quit"),
            ]),
            RegistrationFocus::StudentName | RegistrationFocus::Email => key_hints(&[
                ("Enter", "Register"),
                ("Tab", "Next field"),
                ("Esc", "List"),
                ("F1-F4", "Screens"),
            ]),
            _ => key_hints(&[
                ("←→", "Choose"),
                ("Enter", "Register"),
                ("Tab", "Next field"),
                ("1-4", "Screens"),
                ("q", "Quit"),
            ]),
        }
    }
}
