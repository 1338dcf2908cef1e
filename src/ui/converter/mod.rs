// Converter screen implementation

use crate::control::{Dispatch, Field, JobPhase, Mode};
use crate::ui::components::{Footer, render_radio_group};
use crate::ui::focus::Pane;
use crate::ui::state::AppState;
use crate::ui::widgets::{EnhancedProgress, ProgressState};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget},
};

mod sections;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub struct Converter;

impl Converter {
    pub fn render<D: Dispatch>(frame: &mut Frame, state: &mut AppState<D>) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Input + mode
                Constraint::Min(8),    // Formats / presets / fields
                Constraint::Length(4), // Progress
                Constraint::Length(1), // Status
                Constraint::Length(1), // Footer
            ])
            .split(area);

        Self::render_header(frame, chunks[0], state);
        Self::render_body(frame, chunks[1], state);
        Self::render_progress(frame, chunks[2], state);
        Self::render_status(frame, chunks[3], state);

        Footer::converter(state.settings.mode(), state.job.is_active())
            .render(chunks[4], frame.buffer_mut());
    }

    fn pane_block(title: &str, focused: bool) -> Block<'static> {
        let border = if focused { Color::Yellow } else { Color::White };
        Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
    }

    fn highlight_style() -> Style {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }
}
