//! Interactive terminal chart view.
//!
//! [`ChartApp`] takes over the terminal with the alternate screen, draws the
//! throughput chart and waits for the user to quit.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

use crate::chart::{render_chart, ChartData};
use crate::themes::Theme;

/// Full-screen chart viewer.
pub struct ChartApp {
    /// Active colour theme.
    pub theme: Theme,
    /// Data being shown.
    pub data: ChartData,
}

impl ChartApp {
    /// Construct a viewer for `data`.
    pub fn new(theme_name: &str, data: ChartData) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            data,
        }
    }

    /// Show the chart until `q`, `Esc` or `Ctrl+C` is pressed.
    ///
    /// The terminal is restored even when drawing fails.
    pub fn run(self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if is_quit_key(key.code, key.modifiers) {
                            break Ok(());
                        }
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        render_chart(area, frame.buffer_mut(), &self.data, &self.theme);
    }
}

fn is_quit_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        _ => false,
    }
}
