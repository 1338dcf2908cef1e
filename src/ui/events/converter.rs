use super::*;
use crate::control::{Field, Mode, begin};
use crate::engine::is_media_file;
use crate::ui::focus::Pane;
use crate::ui::prompt::PromptState;
use crate::ui::state::NoticeKind;
use ratatui::widgets::ListState;
use std::path::Path;

fn move_cursor(list: &mut ListState, len: usize, delta: isize) {
    if len == 0 {
        list.select(None);
        return;
    }
    let current = list.selected().unwrap_or(0) as isize;
    let next = (current + delta).clamp(0, len as isize - 1);
    list.select(Some(next as usize));
}

/// Set the input path if it names an existing media file. Returns the error otherwise.
pub(super) fn select_input<D: Dispatch>(state: &mut AppState<D>, raw: &str) -> Option<String> {
    let path = Path::new(raw.trim());
    if raw.trim().is_empty() {
        return Some("Enter a file path".to_string());
    }
    if !is_media_file(path) {
        return Some("Not a supported video or audio file".to_string());
    }
    if !path.is_file() {
        return Some(format!("File not found: {}", path.display()));
    }

    state.settings.set_input(Some(path.to_path_buf()));
    state.status = format!("Selected {}", path.display());
    tracing::debug!(input = %path.display(), "input selected");
    None
}

pub(super) fn handle_converter_key<D: Dispatch>(key: KeyEvent, state: &mut AppState<D>) {
    let advanced = state.settings.mode() == Mode::Advanced;

    match key.code {
        KeyCode::Char('i') | KeyCode::Char('I') => open_input_prompt(state),
        KeyCode::Char('s') | KeyCode::Char('S') => start(state),
        KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Esc => cancel(state),
        KeyCode::Char('m') | KeyCode::Char('M') => {
            state.settings.toggle_mode();
            if state.settings.mode() == Mode::Quick && state.focus == Pane::Fields {
                state.focus = Pane::Formats;
            }
            state.status = format!("{} mode", state.settings.mode());
        }
        KeyCode::Tab => state.focus = state.focus.next(advanced),
        KeyCode::BackTab => state.focus = state.focus.prev(advanced),
        KeyCode::Up | KeyCode::Char('k') => move_focused(state, -1),
        KeyCode::Down | KeyCode::Char('j') => move_focused(state, 1),
        KeyCode::Left if state.focus == Pane::Fields => cycle_field(state, -1),
        KeyCode::Right if state.focus == Pane::Fields => cycle_field(state, 1),
        KeyCode::Enter | KeyCode::Char(' ') => activate(state),
        _ => {}
    }
}

fn move_focused<D: Dispatch>(state: &mut AppState<D>, delta: isize) {
    match state.focus {
        Pane::Formats => {
            let len = state.format_rows().len();
            move_cursor(&mut state.format_list, len, delta);
        }
        Pane::Presets => {
            let len = state.catalog.presets().len();
            move_cursor(&mut state.preset_list, len, delta);
        }
        Pane::Fields => move_cursor(&mut state.field_list, Field::ALL.len(), delta),
    }
}

fn focused_field<D: Dispatch>(state: &AppState<D>) -> Option<Field> {
    state
        .field_list
        .selected()
        .and_then(|i| Field::ALL.get(i))
        .copied()
}

fn activate<D: Dispatch>(state: &mut AppState<D>) {
    match state.focus {
        Pane::Formats => {
            let ext = state.format_list.selected().and_then(|i| {
                state
                    .format_rows()
                    .get(i)
                    .and_then(|f| f.canonical_extension())
                    .map(str::to_string)
            });
            if let Some(ext) = ext {
                state.settings.select_format(&ext);
                state.status = format!("Target format: .{}", ext);
            }
        }
        Pane::Presets => {
            let preset = state
                .preset_list
                .selected()
                .and_then(|i| state.catalog.presets().get(i))
                .cloned();
            if let Some(preset) = preset {
                state.settings.apply_preset(&preset);
                state.sync_format_cursor();
                state.status = format!("Applied preset {}", preset.name);
            }
        }
        Pane::Fields => {
            if let Some(field) = focused_field(state) {
                let current = state.settings.field(field).to_string();
                state.prompt = Some(PromptState::field(field, &current));
            }
        }
    }
}

/// Step through the suggested values of the focused field
fn cycle_field<D: Dispatch>(state: &mut AppState<D>, delta: isize) {
    let Some(field) = focused_field(state) else {
        return;
    };
    let options = field.options();
    if options.is_empty() {
        return;
    }

    let current = state.settings.field(field);
    let next = match options.iter().position(|o| *o == current) {
        Some(i) => (i as isize + delta).rem_euclid(options.len() as isize) as usize,
        None => 0,
    };
    state.settings.set_field(field, options[next]);
}

fn open_input_prompt<D: Dispatch>(state: &mut AppState<D>) {
    let current = state
        .settings
        .input_path()
        .map(|p| p.to_string_lossy().to_string())
        .or_else(|| {
            std::env::current_dir()
                .ok()
                .map(|d| format!("{}/", d.display()))
        })
        .unwrap_or_default();
    state.prompt = Some(PromptState::input(&current));
}

fn start<D: Dispatch>(state: &mut AppState<D>) {
    if !state.job.can_submit() {
        state.status = "A conversion is already running".to_string();
        return;
    }

    match begin(&state.settings, state.filename_pattern.as_deref()) {
        Ok(destination) => state.prompt = Some(PromptState::destination(destination)),
        Err(e) => state.show_notice(NoticeKind::Error, "Cannot start", e.to_string()),
    }
}

fn cancel<D: Dispatch>(state: &mut AppState<D>) {
    if let Some(outcome) = state.job.cancel() {
        state.apply_outcome(outcome);
    }
}
