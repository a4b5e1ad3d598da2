use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use rusqlite::Connection;
use tracing::debug;

use super::notify::Notifications;
use super::routes::Route;
use super::views::{
    CourseOfferingsView, CourseTypesView, CoursesView, LoadState, RegistrationsView, View,
};

/// Footer rows: a top border, up to three toasts and the key hints.
const FOOTER_HEIGHT: u16 = 5;
/// Navigation bar with its border.
const NAV_HEIGHT: u16 = 3;

/// The mounted screen. Navigating replaces it with a fresh instance, so no
/// view state survives a route change.
enum Screen {
    CourseTypes(CourseTypesView),
    Courses(CoursesView),
    CourseOfferings(CourseOfferingsView),
    Registrations(RegistrationsView),
}

impl Screen {
    fn mount(route: Route) -> Self {
        match route {
            Route::CourseTypes => Screen::CourseTypes(CourseTypesView::new()),
            Route::Courses => Screen::Courses(CoursesView::new()),
            Route::CourseOfferings => Screen::CourseOfferings(CourseOfferingsView::new()),
            Route::Registrations => Screen::Registrations(RegistrationsView::new()),
        }
    }

    fn view(&self) -> &dyn View {
        match self {
            Screen::CourseTypes(view) => view,
            Screen::Courses(view) => view,
            Screen::CourseOfferings(view) => view,
            Screen::Registrations(view) => view,
        }
    }

    fn view_mut(&mut self) -> &mut dyn View {
        match self {
            Screen::CourseTypes(view) => view,
            Screen::Courses(view) => view,
            Screen::CourseOfferings(view) => view,
            Screen::Registrations(view) => view,
        }
    }
}

/// Navigation shell: owns the connection, the mounted screen and the toast
/// queue, and routes key presses either to itself or to the screen.
pub struct App {
    conn: Connection,
    route: Route,
    screen: Screen,
    notes: Notifications,
}

impl App {
    /// Build the shell on `route`. The screen starts in its loading state and
    /// fetches on the first [`App::tick`].
    pub fn new(conn: Connection, route: Route, toast_ttl: Duration) -> Self {
        Self {
            conn,
            route,
            screen: Screen::mount(route),
            notes: Notifications::new(toast_ttl),
        }
    }

    /// Route of the mounted screen.
    pub fn route(&self) -> Route {
        self.route
    }

    /// Toasts currently queued for the footer.
    pub fn notifications(&self) -> &Notifications {
        &self.notes
    }

    /// Mount a fresh view for `route`. It loads on the next [`App::tick`].
    pub fn navigate(&mut self, route: Route) {
        debug!(path = route.path(), "navigating");
        self.route = route;
        self.screen = Screen::mount(route);
    }

    /// Housekeeping between frames: load a freshly mounted view and expire old
    /// toasts. Returns true when something changed and a redraw is due.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;
        if self.screen.view().load_state() == LoadState::Loading {
            self.screen.view_mut().load(&self.conn, &mut self.notes);
            changed = true;
        }
        if self.notes.prune(Instant::now()) {
            changed = true;
        }
        changed
    }

    /// Apply one key press. Returns true when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if let KeyCode::F(n) = code {
            if let Some(route) = Route::from_shortcut(n) {
                self.navigate(route);
                return false;
            }
        }

        if !self.screen.view().captures_text() {
            match code {
                KeyCode::Char('q') => return true,
                KeyCode::Char(ch @ '1'..='4') => {
                    if let Some(route) = ch
                        .to_digit(10)
                        .and_then(|n| u8::try_from(n).ok())
                        .and_then(Route::from_shortcut)
                    {
                        self.navigate(route);
                    }
                    return false;
                }
                _ => {}
            }
        }

        self.screen
            .view_mut()
            .handle_key(code, &self.conn, &mut self.notes);
        false
    }

    /// Render the navigation bar, the mounted screen and the footer.
    pub fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(NAV_HEIGHT),
                Constraint::Min(5),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(frame.area());

        self.draw_nav(frame, chunks[0]);
        self.screen.view().draw(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    /// Tab bar with the numbered screens; the mounted one is highlighted.
    fn draw_nav(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Route::ALL
            .iter()
            .map(|route| Line::from(format!("{} {}", route.index() + 1, route.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Course Manager"),
            )
            .select(self.route.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    /// Toasts stacked above the key hints, which stay on the last row.
    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let mut lines: Vec<Line> = self
            .notes
            .iter()
            .map(|toast| {
                Line::from(Span::styled(
                    format!("{} {}", toast.kind.marker(), toast.message),
                    toast.kind.style(),
                ))
            })
            .collect();
        let padding = usize::from(inner.height.saturating_sub(1)).saturating_sub(lines.len());
        lines.extend(std::iter::repeat(Line::from("")).take(padding));
        lines.push(self.screen.view().key_hints());

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }
}
