use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use super::app::App;

/// How long to wait for input before running housekeeping again.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Spin up the terminal backend, enter the draw loop, and keep processing input
/// until the user quits.
pub fn run_app(app: &mut App) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut terminal = undo_on_error(setup_terminal, restore_after_failed_setup)?;

    let result = event_loop(&mut terminal, app);

    cleanup_terminal(&mut terminal)?;
    info!(path = app.route().path(), "session ended");
    result
}

/// Run `setup`; if it fails, run `undo` before handing back the error.
fn undo_on_error<T>(setup: impl FnOnce() -> Result<T>, undo: impl FnOnce()) -> Result<T> {
    setup().inspect_err(|_| undo())
}

/// Enter the alternate screen and wrap stdout in a ratatui terminal. Raw mode
/// is already on when this runs.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("failed to create terminal backend")
}

/// Best-effort undo of a partial setup so the shell is usable again. The
/// setup error is what gets reported, so failures here are only logged.
fn restore_after_failed_setup() {
    if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen) {
        warn!(error = %err, "failed to leave alternate screen after setup error");
    }
    if let Err(err) = disable_raw_mode() {
        warn!(error = %err, "failed to disable raw mode after setup error");
    }
}

/// Draw, run housekeeping, then wait for one key press. Returns when the user
/// quits or the terminal fails.
fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        // A freshly mounted view is drawn once in its loading state before it
        // fetches, so the indicator is visible.
        if app.tick() {
            continue;
        }

        if !event::poll(POLL_INTERVAL).context("event polling failed")? {
            continue;
        }
        let Event::Key(key_event) = event::read().context("failed to read event")? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            return Ok(());
        }
        if app.handle_key(key_event.code) {
            return Ok(());
        }
    }
}

/// Leave raw mode and the alternate screen, and show the cursor again.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use anyhow::anyhow;

    use super::*;

    #[test]
    fn failed_setup_runs_the_undo() {
        let undone = Cell::new(false);
        let result: Result<()> =
            undo_on_error(|| Err(anyhow!("no alternate screen")), || undone.set(true));

        assert!(undone.get());
        assert_eq!(result.unwrap_err().to_string(), "no alternate screen");
    }

    #[test]
    fn successful_setup_leaves_raw_mode_alone() {
        let undone = Cell::new(false);
        let value = undo_on_error(|| Ok(7), || undone.set(true)).unwrap();

        assert_eq!(value, 7);
        assert!(!undone.get());
    }
}
