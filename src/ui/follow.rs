use crate::domain::Task;
use crate::ui::bars::{load_band, Band};
use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Redraw interval for the follow view
pub const FOLLOW_TICK_MS: u64 = 250;

/// Snapshot of a running task's progress at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct FollowView {
    pub title: String,
    pub estimated_secs: i64,
    /// Settled time from earlier spans plus the current span
    pub elapsed_secs: i64,
}

impl FollowView {
    pub fn new(task: &Task, now: DateTime<Local>) -> Self {
        let running_secs = if task.is_running() && task.started_at != 0 {
            (now.timestamp() - task.started_at).max(0)
        } else {
            0
        };
        Self {
            title: task.title.clone(),
            estimated_secs: i64::from(task.estimated_minutes) * 60,
            elapsed_secs: i64::from(task.actual_minutes) * 60 + running_secs,
        }
    }

    pub fn remaining_secs(&self) -> i64 {
        (self.estimated_secs - self.elapsed_secs).max(0)
    }

    /// Elapsed over estimate, capped at 1.0
    pub fn ratio(&self) -> f64 {
        if self.estimated_secs <= 0 {
            return 1.0;
        }
        (self.elapsed_secs as f64 / self.estimated_secs as f64).min(1.0)
    }
}

/// Format seconds as "Xh Ym Zs" or "Ym Zs"
pub fn format_duration(total_secs: i64) -> String {
    let total_secs = total_secs.max(0);
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else {
        format!("{}m {}s", minutes, seconds)
    }
}

fn band_color(band: Band) -> Color {
    let (r, g, b) = band.rgb();
    Color::Rgb(r, g, b)
}

fn render(f: &mut Frame, view: &FollowView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(f.size());

    let ratio = view.ratio();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view.title.clone()),
        )
        .gauge_style(Style::default().fg(band_color(load_band(ratio))))
        .ratio(ratio.clamp(0.0, 1.0));
    f.render_widget(gauge, chunks[0]);

    let details = Paragraph::new(vec![
        Line::from(format!("Elapsed:   {}", format_duration(view.elapsed_secs))),
        Line::from(format!("Remaining: {}", format_duration(view.remaining_secs()))),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));
    f.render_widget(details, chunks[1]);

    let hint = Paragraph::new("Press q or Ctrl+C to exit")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hint, chunks[2]);
}

/// Full-screen live gauge for a running task. Read-only: nothing is saved.
pub fn run_follow(task: &Task) -> Result<()> {
    enable_raw_mode()?;
    let mut terminal = setup_or_restore(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Ok(Terminal::new(CrosstermBackend::new(stdout))?)
        },
        || {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        },
    )?;

    let result = follow_loop(&mut terminal, task);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Run `setup`; if it fails, `restore` runs before the error is returned
fn setup_or_restore<T>(setup: impl FnOnce() -> Result<T>, restore: impl FnOnce()) -> Result<T> {
    setup().map_err(|err| {
        restore();
        err
    })
}

fn follow_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, task: &Task) -> Result<()> {
    let tick_rate = Duration::from_millis(FOLLOW_TICK_MS);

    loop {
        let view = FollowView::new(task, Local::now());
        terminal.draw(|f| render(f, &view))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let ctrl_c = key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL);
                if ctrl_c || key.code == KeyCode::Char('q') || key.code == KeyCode::Esc {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskStatus;
    use chrono::TimeZone;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0m 0s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(3600 + 61), "1h 1m 1s");
        assert_eq!(format_duration(-5), "0m 0s");
    }

    #[test]
    fn test_follow_view_includes_settled_time() {
        let start = Local.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let task = Task {
            title: "Write".to_string(),
            estimated_minutes: 60,
            actual_minutes: 10,
            status: TaskStatus::Started,
            started_at: start.timestamp(),
        };

        let view = FollowView::new(&task, start + chrono::Duration::minutes(20));
        assert_eq!(view.elapsed_secs, 30 * 60);
        assert_eq!(view.remaining_secs(), 30 * 60);
        assert_eq!(view.ratio(), 0.5);
    }

    #[test]
    fn test_follow_view_caps_ratio() {
        let start = Local.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let task = Task {
            title: "Overrun".to_string(),
            estimated_minutes: 10,
            actual_minutes: 0,
            status: TaskStatus::Started,
            started_at: start.timestamp(),
        };

        let view = FollowView::new(&task, start + chrono::Duration::minutes(25));
        assert_eq!(view.ratio(), 1.0);
        assert_eq!(view.remaining_secs(), 0);
    }

    #[test]
    fn test_failed_setup_restores_terminal() {
        let restored = std::cell::Cell::new(false);
        let result: Result<()> =
            setup_or_restore(|| Err(anyhow::anyhow!("no tty")), || restored.set(true));
        assert!(result.is_err());
        assert!(restored.get());
    }

    #[test]
    fn test_successful_setup_keeps_terminal() {
        let restored = std::cell::Cell::new(false);
        let value = setup_or_restore(|| Ok(7), || restored.set(true)).unwrap();
        assert_eq!(value, 7);
        assert!(!restored.get());
    }
}
