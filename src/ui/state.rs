// Application state management

use crate::config::Config;
use crate::control::{
    CatalogStore, ConversionSettings, Dispatch, JobController, JobOutcome, ProgressSubscriber,
};
use crate::engine::{FormatDescriptor, MediaCategory, WorkerHandle};
use crate::ui::focus::Pane;
use crate::ui::prompt::PromptState;
use chrono::{DateTime, Local};
use ratatui::widgets::ListState;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// Modal message (completion, failure, validation)
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    pub at: DateTime<Local>,
}

/// State for the quit confirmation modal
#[derive(Debug, Clone)]
pub struct QuitConfirmationState {
    /// Phase label of the job that would be cancelled
    pub phase: &'static str,
}

pub struct AppState<D: Dispatch = WorkerHandle> {
    pub settings: ConversionSettings,
    pub catalog: CatalogStore,
    pub job: JobController<D>,
    pub progress: ProgressSubscriber,
    pub focus: Pane,
    pub format_list: ListState,
    pub preset_list: ListState,
    pub field_list: ListState,
    pub prompt: Option<PromptState>,
    pub notice: Option<Notice>,
    pub quit_confirmation: Option<QuitConfirmationState>,
    pub filename_pattern: Option<String>,
    pub status: String,
    pub job_started: Option<Instant>,
    /// A cancel was issued while quitting
    pub awaiting_cancel: bool,
    pub tick: u64,
    pub app_version: String,
}

impl<D: Dispatch> AppState<D> {
    pub fn new(job: JobController<D>, progress: ProgressSubscriber, config: &Config) -> Self {
        let mut state = Self {
            settings: ConversionSettings::from_defaults(&config.defaults),
            catalog: CatalogStore::new(),
            job,
            progress,
            focus: Pane::Formats,
            format_list: ListState::default(),
            preset_list: ListState::default(),
            field_list: ListState::default(),
            prompt: None,
            notice: None,
            quit_confirmation: None,
            filename_pattern: config.defaults.filename_pattern().map(str::to_string),
            status: "Loading formats and presets...".to_string(),
            job_started: None,
            awaiting_cancel: false,
            tick: 0,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        };
        state.field_list.select(Some(0));
        state
    }

    /// Formats in display order: video first, then audio
    pub fn format_rows(&self) -> Vec<&FormatDescriptor> {
        self.catalog
            .formats_by_category(MediaCategory::Video)
            .chain(self.catalog.formats_by_category(MediaCategory::Audio))
            .collect()
    }

    /// Point the format cursor at the selected format, if it is listed
    pub fn sync_format_cursor(&mut self) {
        let selected = self.settings.selected_format();
        let index = self
            .format_rows()
            .iter()
            .position(|f| f.canonical_extension() == Some(selected));
        if index.is_some() {
            self.format_list.select(index);
        } else if self.format_list.selected().is_none() && !self.catalog.formats().is_empty() {
            self.format_list.select(Some(0));
        }
    }

    pub fn sync_preset_cursor(&mut self) {
        if self.preset_list.selected().is_none() && !self.catalog.presets().is_empty() {
            self.preset_list.select(Some(0));
        }
    }

    pub fn show_notice(&mut self, kind: NoticeKind, title: &str, message: impl Into<String>) {
        self.notice = Some(Notice {
            kind,
            title: title.to_string(),
            message: message.into(),
            at: Local::now(),
        });
    }

    /// Reflect a terminal job outcome in the UI
    pub fn apply_outcome(&mut self, outcome: JobOutcome) {
        let elapsed = self
            .job_started
            .take()
            .map(|t| format!(" after {:.1}s", t.elapsed().as_secs_f64()))
            .unwrap_or_default();

        match &outcome {
            JobOutcome::Completed(message) => {
                self.status = format!("Done{}", elapsed);
                self.show_notice(NoticeKind::Success, "Conversion complete", message.clone());
            }
            JobOutcome::Failed(message) => {
                self.status = format!("Failed{}", elapsed);
                self.show_notice(NoticeKind::Error, "Conversion failed", message.clone());
            }
            JobOutcome::Cancelled => {
                self.status = format!("{}{}", outcome.message(), elapsed);
            }
        }
    }
}
