use super::*;
use crate::control::complete;
use crate::ui::prompt::{PromptKind, PromptState, textarea_input};
use crate::ui::state::NoticeKind;
use std::path::PathBuf;

pub(super) fn handle_prompt_key<D: Dispatch>(key: KeyEvent, state: &mut AppState<D>) {
    let Some(mut prompt) = state.prompt.take() else {
        return;
    };

    match key.code {
        KeyCode::Esc => finish(state, prompt, None),
        KeyCode::Enter => {
            let value = prompt.value();
            finish(state, prompt, Some(value));
        }
        _ => {
            if let Some(input) = textarea_input(key) {
                prompt.textarea.input(input);
                prompt.error = None;
            }
            state.prompt = Some(prompt);
        }
    }
}

/// Close (or keep, on input errors) the prompt. `None` means the user dismissed it.
fn finish<D: Dispatch>(state: &mut AppState<D>, mut prompt: PromptState, value: Option<String>) {
    match prompt.kind.clone() {
        PromptKind::Input => {
            let Some(value) = value else {
                return;
            };
            if let Some(err) = converter::select_input(state, &value) {
                prompt.error = Some(err);
                state.prompt = Some(prompt);
            }
        }
        PromptKind::Field(field) => {
            if let Some(value) = value {
                state.settings.set_field(field, value);
            }
        }
        PromptKind::Destination(_) => {
            let chosen = value.map(PathBuf::from);
            submit(state, chosen);
        }
    }
}

fn submit<D: Dispatch>(state: &mut AppState<D>, chosen: Option<PathBuf>) {
    let request = match complete(&state.settings, &state.catalog, chosen) {
        Ok(Some(request)) => request,
        Ok(None) => return,
        Err(e) => {
            state.show_notice(NoticeKind::Error, "Cannot start", e.to_string());
            return;
        }
    };

    let output = request.output_path.clone();
    match state.job.submit(request) {
        Ok(_) => {
            state.job_started = Some(Instant::now());
            state.status = format!("Converting to {}", output);
        }
        Err(e) => state.show_notice(NoticeKind::Info, "Busy", e.to_string()),
    }
}
