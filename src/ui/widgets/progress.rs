// Conversion progress bar with different visual states

use crate::control::JobPhase;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    Running,
    /// Submitted, waiting for the first sample
    Starting,
    Idle,
}

impl From<&JobPhase> for ProgressState {
    fn from(phase: &JobPhase) -> Self {
        match phase {
            JobPhase::Idle => Self::Idle,
            JobPhase::Submitting => Self::Starting,
            JobPhase::Running(_) => Self::Running,
        }
    }
}

pub struct EnhancedProgress {
    percent: f32,
    state: ProgressState,
}

impl EnhancedProgress {
    pub fn new(percent: f32, state: ProgressState) -> Self {
        Self {
            percent: percent.clamp(0.0, 100.0),
            state,
        }
    }

    pub fn filled_width(&self, width: u16) -> u16 {
        let ratio = f64::from(self.percent) / 100.0;
        ((f64::from(width) * ratio).round() as u16).min(width)
    }
}

impl Widget for EnhancedProgress {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let filled_width = self.filled_width(area.width);

        let (filled_symbol, unfilled_symbol, filled_fg, unfilled_fg) = match self.state {
            ProgressState::Running => ("█", "░", Color::Green, Color::DarkGray),
            ProgressState::Starting => ("▓", "░", Color::Yellow, Color::DarkGray),
            ProgressState::Idle => ("░", "░", Color::DarkGray, Color::DarkGray),
        };

        for x in 0..area.width {
            let (symbol, fg) = if x < filled_width {
                (filled_symbol, filled_fg)
            } else {
                (unfilled_symbol, unfilled_fg)
            };
            buf.set_string(area.x + x, area.y, symbol, Style::default().fg(fg));
        }
    }
}
