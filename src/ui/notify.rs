use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::style::{Color, Style};

/// Most toasts kept on screen at once; older ones are dropped first.
const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub(crate) fn style(self) -> Style {
        match self {
            ToastKind::Success => Style::default().fg(Color::Green),
            ToastKind::Error => Style::default().fg(Color::Red),
        }
    }

    pub(crate) fn marker(self) -> &'static str {
        match self {
            ToastKind::Success => "✔",
            ToastKind::Error => "✖",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    shown_at: Instant,
}

/// Fire-and-forget notification queue rendered in the footer. Toasts expire
/// after `ttl`; nothing ever waits on them.
#[derive(Debug)]
pub struct Notifications {
    toasts: VecDeque<Toast>,
    ttl: Duration,
}

impl Notifications {
    /// Empty queue whose toasts expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            ttl,
        }
    }

    /// Queue a toast, dropping the oldest once more than three are waiting.
    pub fn notify<S: Into<String>>(&mut self, kind: ToastKind, message: S) {
        self.toasts.push_back(Toast {
            kind,
            message: message.into(),
            shown_at: Instant::now(),
        });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
    }

    /// Queue a green confirmation toast.
    pub fn success<S: Into<String>>(&mut self, message: S) {
        self.notify(ToastKind::Success, message);
    }

    /// Queue a red failure toast.
    pub fn error<S: Into<String>>(&mut self, message: S) {
        self.notify(ToastKind::Error, message);
    }

    /// Drop toasts older than the configured lifetime. Returns whether anything
    /// was removed so the caller knows to redraw.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        let ttl = self.ttl;
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < ttl);
        self.toasts.len() != before
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    /// Most recently queued toast, if any.
    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_toast_is_last_pushed() {
        let mut notes = Notifications::new(Duration::from_secs(4));
        notes.success("Course created successfully");
        notes.error("Failed to load courses");

        let latest = notes.latest().unwrap();
        assert_eq!(latest.kind, ToastKind::Error);
        assert_eq!(latest.message, "Failed to load courses");
    }

    #[test]
    fn queue_is_capped() {
        let mut notes = Notifications::new(Duration::from_secs(4));
        for n in 0..5 {
            notes.success(format!("toast {n}"));
        }
        let messages: Vec<_> = notes.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["toast 2", "toast 3", "toast 4"]);
    }

    #[test]
    fn prune_expires_old_toasts() {
        let mut notes = Notifications::new(Duration::from_millis(50));
        notes.success("saved");

        assert!(!notes.prune(Instant::now()));
        assert!(notes.prune(Instant::now() + Duration::from_millis(60)));
        assert!(notes.is_empty());
    }
}
