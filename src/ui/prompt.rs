// Path and field prompts backed by tui-textarea

use crate::control::{DestinationRequest, Field};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tui_textarea::{CursorMove, Input, Key, TextArea};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// Choose the input media file
    Input,
    /// Choose where to write the output
    Destination(DestinationRequest),
    /// Free-form value for an advanced field
    Field(Field),
}

pub struct PromptState {
    pub kind: PromptKind,
    pub textarea: TextArea<'static>,
    pub error: Option<String>,
}

impl PromptState {
    fn with_value(kind: PromptKind, value: &str) -> Self {
        let mut textarea = TextArea::new(vec![value.to_string()]);
        textarea.move_cursor(CursorMove::End);
        textarea.set_cursor_line_style(Style::default());
        Self {
            kind,
            textarea,
            error: None,
        }
    }

    pub fn input(current: &str) -> Self {
        Self::with_value(PromptKind::Input, current)
    }

    pub fn destination(request: DestinationRequest) -> Self {
        let suggested = request.suggested.to_string_lossy().to_string();
        Self::with_value(PromptKind::Destination(request), &suggested)
    }

    pub fn field(field: Field, current: &str) -> Self {
        Self::with_value(PromptKind::Field(field), current)
    }

    /// Current single-line value, trimmed
    pub fn value(&self) -> String {
        self.textarea
            .lines()
            .first()
            .map(|l| l.trim().to_string())
            .unwrap_or_default()
    }

    pub fn title(&self) -> String {
        match &self.kind {
            PromptKind::Input => " Select input file ".to_string(),
            PromptKind::Destination(request) => format!(" Save as (*.{}) ", request.extension),
            PromptKind::Field(field) => format!(" {} ", field.label()),
        }
    }

    fn hint(&self) -> String {
        match &self.kind {
            PromptKind::Input => "Video or audio file path".to_string(),
            PromptKind::Destination(request) => {
                format!(".{} is added when missing", request.extension)
            }
            PromptKind::Field(field) if field.is_optional() => {
                "Leave empty to keep the source value".to_string()
            }
            PromptKind::Field(field) if !field.options().is_empty() => {
                format!("e.g. {}", field.options().join(", "))
            }
            PromptKind::Field(_) => String::new(),
        }
    }
}

/// Translate a terminal key into a textarea input. Enter and Esc stay with the caller.
pub fn textarea_input(key: KeyEvent) -> Option<Input> {
    let mapped = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Tab => Key::Tab,
        _ => return None,
    };
    Some(Input {
        key: mapped,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
    })
}

pub struct PromptModal;

impl PromptModal {
    pub fn render(frame: &mut Frame, state: &mut PromptState) {
        let area = frame.area();

        let modal_width = 72.min(area.width.saturating_sub(4));
        let modal_height = 7.min(area.height.saturating_sub(2));
        let modal_area = Rect {
            x: (area.width.saturating_sub(modal_width)) / 2,
            y: (area.height.saturating_sub(modal_height)) / 2,
            width: modal_width,
            height: modal_height,
        };

        frame.render_widget(Clear, modal_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(state.title())
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black));
        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        state.textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(&state.textarea, rows[0]);

        let message = match &state.error {
            Some(err) => Line::from(Span::styled(
                err.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            None => Line::from(vec![
                Span::styled(state.hint(), Style::default().fg(Color::Gray)),
                Span::raw("   "),
                Span::styled("[Enter]", Style::default().fg(Color::Yellow)),
                Span::raw(" OK  "),
                Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
                Span::raw(" Cancel"),
            ]),
        };
        frame.render_widget(Paragraph::new(message), rows[1]);
    }
}
