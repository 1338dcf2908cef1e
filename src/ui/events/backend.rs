use super::*;

/// Route one backend resolution to the component that owns it
pub fn handle_backend_event<D: Dispatch>(event: BackendEvent, state: &mut AppState<D>) {
    match event {
        BackendEvent::FormatsLoaded(result) => {
            state.catalog.load_formats(result);
            state.sync_format_cursor();
            update_catalog_status(state);
        }
        BackendEvent::PresetsLoaded(result) => {
            state.catalog.load_presets(result);
            state.sync_preset_cursor();
            update_catalog_status(state);
        }
        BackendEvent::ConvertResolved { ticket, result } => {
            // Samples emitted before the resolution belong to this job
            state.progress.drain(&mut state.job);
            if let Some(outcome) = state.job.on_submit_resolved(ticket, result) {
                state.apply_outcome(outcome);
            }
        }
        BackendEvent::CancelResolved(result) => state.job.on_cancel_resolved(result),
    }
}

fn update_catalog_status<D: Dispatch>(state: &mut AppState<D>) {
    if !state.catalog.is_loaded() {
        return;
    }
    state.status = match (
        state.catalog.formats().is_empty(),
        state.catalog.presets().is_empty(),
    ) {
        (false, false) => "Ready".to_string(),
        (true, _) => format!(
            "Format list unavailable, converting to .{}",
            state.settings.selected_format()
        ),
        (false, true) => "Preset list unavailable".to_string(),
    };
}
