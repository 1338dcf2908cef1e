// Reusable UI components

use crate::control::Mode;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub struct Footer {
    content: Line<'static>,
}

impl Footer {
    /// Controls for the converter screen; start and cancel swap while a job runs
    pub fn converter(mode: Mode, job_active: bool) -> Self {
        let run_control = if job_active {
            ("[C]", "ancel")
        } else {
            ("[S]", "tart")
        };
        let mode_control = match mode {
            Mode::Quick => ("[M]", " Advanced"),
            Mode::Advanced => ("[M]", " Quick"),
        };

        let controls = [
            ("[I]", "nput"),
            run_control,
            mode_control,
            ("[Tab]", " Pane"),
            ("[↑/↓]", " Move"),
            ("[Enter]", " Select"),
            ("[Q]", "uit"),
        ];

        let mut spans = vec![Span::raw("CONTROLS: ")];

        for (i, (hotkey, desc)) in controls.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(*hotkey, Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(*desc));
        }

        Self {
            content: Line::from(spans),
        }
    }
}

impl Widget for Footer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.content)
            .style(Style::default().bg(Color::DarkGray))
            .render(area, buf);
    }
}

pub fn render_radio_group(
    options: &[&str],
    selected_index: usize,
    focused: bool,
    area: Rect,
    buf: &mut Buffer,
) {
    let mut spans = Vec::new();

    for (i, option) in options.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }

        let symbol = if i == selected_index { "(•)" } else { "( )" };
        let symbol_style = if focused && i == selected_index {
            Style::default().fg(Color::Yellow).bold()
        } else if i == selected_index {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        spans.push(Span::styled(symbol, symbol_style));
        spans.push(Span::raw(" "));
        spans.push(Span::raw(*option));
    }

    let text = Line::from(spans);
    buf.set_line(area.x, area.y, &text, area.width);
}
