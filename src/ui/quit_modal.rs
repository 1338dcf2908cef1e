// Quit confirmation and notice modals

use crate::ui::state::{Notice, NoticeKind, QuitConfirmationState};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: (area.width.saturating_sub(width)) / 2,
        y: (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn modal_block(title: String, color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title)
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black))
}

pub struct QuitModal;

impl QuitModal {
    pub fn render(frame: &mut Frame, state: &QuitConfirmationState) {
        let modal_area = centered(frame.area(), 50, 7);
        frame.render_widget(Clear, modal_area);

        let block = modal_block(" Quit Confirmation ".to_string(), Color::Yellow);
        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let lines = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                format!("A conversion is running ({}).", state.phase.to_lowercase()),
                Style::default().fg(Color::White),
            )]),
            Line::from(vec![Span::styled(
                "Quitting will cancel it.",
                Style::default().fg(Color::Gray),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "[Y]",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" Quit   "),
                Span::styled(
                    "[N]",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" Keep converting"),
            ]),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White));

        frame.render_widget(paragraph, inner);
    }
}

pub struct NoticeModal;

impl NoticeModal {
    pub fn render(frame: &mut Frame, notice: &Notice) {
        let modal_area = centered(frame.area(), 64, 9);
        frame.render_widget(Clear, modal_area);

        let color = match notice.kind {
            NoticeKind::Success => Color::Green,
            NoticeKind::Error => Color::Red,
            NoticeKind::Info => Color::Cyan,
        };
        let block = modal_block(format!(" {} ", notice.title), color);
        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                notice.message.clone(),
                Style::default().fg(Color::White),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    notice.at.format("%H:%M:%S").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw("   "),
                Span::styled("[Enter]", Style::default().fg(Color::Yellow)),
                Span::raw(" Close"),
            ]),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, inner);
    }
}
