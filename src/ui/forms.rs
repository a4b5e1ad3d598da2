use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Single-line text field backing every name/email input.
#[derive(Debug, Default, Clone)]
pub(crate) struct TextInput {
    value: String,
}

impl TextInput {
    /// Append a character, ignoring control characters.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value.pop();
    }

    pub(crate) fn set(&mut self, value: &str) {
        self.value = value.to_string();
    }

    pub(crate) fn clear(&mut self) {
        self.value.clear();
    }

    pub(crate) fn value(&self) -> &str {
        &self.value
    }

    /// Trimmed value, or `None` when the field is blank.
    pub(crate) fn required(&self) -> Option<String> {
        let trimmed = self.value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub(crate) fn char_len(&self) -> usize {
        self.value.chars().count()
    }
}

/// One entry in a [`Dropdown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DropdownOption {
    pub(crate) id: i64,
    pub(crate) label: String,
}

impl DropdownOption {
    pub(crate) fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// Select box with an explicit "nothing selected" state shown as the
/// placeholder. Cycling walks placeholder → first → ... → last → placeholder.
#[derive(Debug, Clone)]
pub(crate) struct Dropdown {
    placeholder: &'static str,
    options: Vec<DropdownOption>,
    selected: Option<usize>,
}

impl Dropdown {
    pub(crate) fn new(placeholder: &'static str) -> Self {
        Self {
            placeholder,
            options: Vec::new(),
            selected: None,
        }
    }

    /// Replace the options, keeping the current selection when its id is still
    /// offered and falling back to the placeholder otherwise.
    pub(crate) fn set_options(&mut self, options: Vec<DropdownOption>) {
        let previous = self.selected_id();
        self.options = options;
        self.selected = previous.and_then(|id| self.options.iter().position(|o| o.id == id));
    }

    pub(crate) fn next(&mut self) {
        self.selected = match self.selected {
            None if !self.options.is_empty() => Some(0),
            Some(idx) if idx + 1 < self.options.len() => Some(idx + 1),
            _ => None,
        };
    }

    pub(crate) fn previous(&mut self) {
        self.selected = match self.selected {
            None if !self.options.is_empty() => Some(self.options.len() - 1),
            Some(idx) if idx > 0 => Some(idx - 1),
            _ => None,
        };
    }

    pub(crate) fn select_id(&mut self, id: i64) -> bool {
        match self.options.iter().position(|o| o.id == id) {
            Some(idx) => {
                self.selected = Some(idx);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.selected = None;
    }

    pub(crate) fn selected_id(&self) -> Option<i64> {
        self.selected
            .and_then(|idx| self.options.get(idx))
            .map(|option| option.id)
    }

    /// Text shown in the closed select box.
    pub(crate) fn label(&self) -> &str {
        self.selected
            .and_then(|idx| self.options.get(idx))
            .map(|option| option.label.as_str())
            .unwrap_or(self.placeholder)
    }

    pub(crate) fn len(&self) -> usize {
        self.options.len()
    }

    #[cfg(test)]
    pub(crate) fn labels(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|option| option.label.as_str())
    }
}

/// Render a `Label: value` form row. Blank values show `placeholder` greyed
/// out; the focused row is highlighted.
pub(crate) fn field_line(
    field_name: &str,
    value: &str,
    placeholder: &str,
    is_active: bool,
) -> Line<'static> {
    let display = if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(display, style),
    ])
}

/// Same as [`field_line`] but decorated with arrows to hint that ←/→ cycle
/// the choices.
pub(crate) fn dropdown_line(field_name: &str, dropdown: &Dropdown, is_active: bool) -> Line<'static> {
    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if dropdown.selected_id().is_none() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(format!("◀ {} ▶", dropdown.label()), style),
        Span::styled(
            format!("  ({} options)", dropdown.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}
