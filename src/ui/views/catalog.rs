use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use rusqlite::Connection;

use crate::error::Mutation;
use crate::ui::forms::{field_line, TextInput};
use crate::ui::helpers::{
    clamp_selection, draw_confirm_delete, draw_placeholder, key_hints, panel_style,
    step_selection, text_cursor_x,
};
use crate::ui::notify::Notifications;

use super::{capitalize, report_invalid, report_mutation, rows_or_empty, LoadState, View};

/// A table whose rows are just a renameable name: course types and courses.
/// Both screens share [`CatalogView`] and differ only in wording and the
/// store calls behind these hooks.
pub(crate) trait CatalogEntry: Clone {
    /// Screen heading, e.g. "Course Types".
    const TITLE: &'static str;
    /// Lowercase singular used in messages, e.g. "course type".
    const NOUN: &'static str;
    /// Lowercase plural used in load failures, e.g. "course types".
    const PLURAL: &'static str;
    const PLACEHOLDER: &'static str;

    fn id(&self) -> i64;
    fn name(&self) -> &str;
    fn fetch_all(conn: &Connection) -> Result<Vec<Self>>;
    fn create(conn: &Connection, name: &str) -> Result<Self>;
    fn rename(conn: &Connection, id: i64, name: &str) -> Result<()>;
    fn delete(conn: &Connection, id: i64) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CatalogFocus {
    Name,
    List,
}

/// Form-plus-list screen. `editing` is `None` in create mode.
pub(crate) struct CatalogView<E: CatalogEntry> {
    pub(crate) items: Vec<E>,
    pub(crate) load_state: LoadState,
    pub(crate) editing: Option<E>,
    pub(crate) name: TextInput,
    pub(crate) focus: CatalogFocus,
    pub(crate) selected: usize,
    pub(crate) confirm: Option<E>,
}

impl<E: CatalogEntry> CatalogView<E> {
    pub(crate) fn new() -> Self {
        Self {
            items: Vec::new(),
            load_state: LoadState::Loading,
            editing: None,
            name: TextInput::default(),
            focus: CatalogFocus::Name,
            selected: 0,
            confirm: None,
        }
    }

    pub(crate) fn reload(&mut self, conn: &Connection, notes: &mut Notifications) {
        self.items = rows_or_empty(E::fetch_all(conn), E::PLURAL, notes);
        self.load_state = LoadState::Loaded;
        self.selected = clamp_selection(self.selected, self.items.len());
    }

    /// Create or rename depending on `editing`. On success the form returns to
    /// create mode and the list is reloaded; on failure nothing changes.
    pub(crate) fn submit(&mut self, conn: &Connection, notes: &mut Notifications) -> bool {
        let Some(name) = self.name.required() else {
            report_invalid(format!("{} name is required.", capitalize(E::NOUN)), notes);
            return false;
        };

        let saved_id = match &self.editing {
            Some(entry) => {
                let id = entry.id();
                report_mutation(
                    E::rename(conn, id, &name).map(|_| id),
                    Mutation::Update,
                    E::NOUN,
                    notes,
                )
            }
            None => report_mutation(
                E::create(conn, &name).map(|created| created.id()),
                Mutation::Create,
                E::NOUN,
                notes,
            ),
        };

        let Some(id) = saved_id else {
            return false;
        };

        self.editing = None;
        self.name.clear();
        self.reload(conn, notes);
        if let Some(idx) = self.items.iter().position(|item| item.id() == id) {
            self.selected = idx;
        }
        true
    }

    /// Load the highlighted row into the form and switch to edit mode.
    pub(crate) fn begin_edit(&mut self) -> bool {
        let Some(entry) = self.items.get(self.selected).cloned() else {
            return false;
        };
        self.name.set(entry.name());
        self.editing = Some(entry);
        self.focus = CatalogFocus::Name;
        true
    }

    pub(crate) fn cancel_edit(&mut self) {
        self.editing = None;
        self.name.clear();
    }

    pub(crate) fn request_delete(&mut self) -> bool {
        self.confirm = self.items.get(self.selected).cloned();
        self.confirm.is_some()
    }

    pub(crate) fn confirm_delete(&mut self, conn: &Connection, notes: &mut Notifications) -> bool {
        let Some(entry) = self.confirm.take() else {
            return false;
        };
        let deleted =
            report_mutation(E::delete(conn, entry.id()), Mutation::Delete, E::NOUN, notes).is_some();
        if deleted {
            if self.editing.as_ref().is_some_and(|e| e.id() == entry.id()) {
                self.cancel_edit();
            }
            self.reload(conn, notes);
        }
        deleted
    }

    fn handle_confirm_key(&mut self, code: KeyCode, conn: &Connection, notes: &mut Notifications) {
        match code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.confirm_delete(conn, notes);
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => self.confirm = None,
            _ => {}
        }
    }

    fn handle_name_key(&mut self, code: KeyCode, conn: &Connection, notes: &mut Notifications) {
        match code {
            KeyCode::Enter => {
                self.submit(conn, notes);
            }
            KeyCode::Backspace => self.name.backspace(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down => self.focus = CatalogFocus::List,
            KeyCode::Esc => {
                if self.editing.is_some() {
                    self.cancel_edit();
                } else {
                    self.focus = CatalogFocus::List;
                }
            }
            KeyCode::Char(ch) => {
                self.name.push_char(ch);
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        let len = self.items.len();
        match code {
            KeyCode::Up => self.selected = step_selection(self.selected, -1, len),
            KeyCode::Down => self.selected = step_selection(self.selected, 1, len),
            KeyCode::PageUp => self.selected = step_selection(self.selected, -5, len),
            KeyCode::PageDown => self.selected = step_selection(self.selected, 5, len),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = len.saturating_sub(1),
            KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('E') => {
                self.begin_edit();
            }
            KeyCode::Delete | KeyCode::Char('d') | KeyCode::Char('D') => {
                self.request_delete();
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Char('a') | KeyCode::Char('+') => {
                self.focus = CatalogFocus::Name;
            }
            KeyCode::Esc => self.cancel_edit(),
            _ => {}
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == CatalogFocus::Name && self.confirm.is_none();
        let title = match &self.editing {
            Some(entry) => format!("Update {} \"{}\"", capitalize(E::NOUN), entry.name()),
            None => format!("Add {}", capitalize(E::NOUN)),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(panel_style(focused))
            .title(title);
        let inner = block.inner(area);

        let hint = if self.editing.is_some() {
            "Enter to update • Esc to stop editing"
        } else {
            "Enter to add • Tab to switch to the list"
        };
        let lines = vec![
            field_line("Name", self.name.value(), E::PLACEHOLDER, focused),
            Line::from(Span::styled(hint, Style::default().fg(Color::Gray))),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if focused {
            let x = text_cursor_x(inner, "Name: ".len(), self.name.char_len());
            frame.set_cursor_position((x, inner.y));
        }
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) {
        let title = format!("{} ({})", E::TITLE, self.items.len());
        if self.load_state == LoadState::Loading {
            draw_placeholder(frame, area, &title, "Loading…");
            return;
        }
        if self.items.is_empty() {
            let message = format!("No {} yet. Type a name above and press Enter.", E::PLURAL);
            draw_placeholder(frame, area, &title, &message);
            return;
        }

        let editing_id = self.editing.as_ref().map(|e| e.id());
        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|entry| {
                let mut spans = vec![Span::raw(entry.name().to_string())];
                if Some(entry.id()) == editing_id {
                    spans.push(Span::styled(
                        "  (editing)",
                        Style::default().fg(Color::Yellow),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let focused = self.focus == CatalogFocus::List;
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

impl<E: CatalogEntry> View for CatalogView<E> {
    fn load_state(&self) -> LoadState {
        self.load_state
    }

    fn load(&mut self, conn: &Connection, notes: &mut Notifications) {
        self.reload(conn, notes);
    }

    fn handle_key(&mut self, code: KeyCode, conn: &Connection, notes: &mut Notifications) {
        if self.confirm.is_some() {
            self.handle_confirm_key(code, conn, notes);
            return;
        }
        match self.focus {
            CatalogFocus::Name => self.handle_name_key(code, conn, notes),
            CatalogFocus::List => self.handle_list_key(code),
        }
    }

    fn captures_text(&self) -> bool {
        self.confirm.is_some() || self.focus == CatalogFocus::Name
    }

    fn draw(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(3)])
            .split(area);

        self.draw_form(frame, chunks[0]);
        self.draw_list(frame, chunks[1]);

        if let Some(entry) = &self.confirm {
            draw_confirm_delete(
                frame,
                area,
                format!("Delete {} \"{}\"?", E::NOUN, entry.name()),
            );
        }
    }

    fn key_hints(&self) -> Line<'static> {
        if self.confirm.is_some() {
            return key_hints(&[("y", "Delete"), ("n/Esc", "Keep")]);
        }
        match self.focus {
            CatalogFocus::Name => key_hints(&[
                ("Enter", "Save"),
                ("Tab", "List"),
                ("Esc", "Cancel edit"),
                ("F1-F4", "Screens"),
            ]),
            CatalogFocus::List => key_hints(&[
                ("↑↓", "Select"),
                ("e", "Edit"),
                ("d", "Delete"),
                ("Tab", "Form"),
                ("1-4", "Screens"),
                ("q", "Quit"),
            ]),
        }
    }
}
