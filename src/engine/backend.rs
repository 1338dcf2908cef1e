// Backend contract and the ffmpeg-driven implementation

use super::core::{
    ConversionRequest, FormatDescriptor, MediaCategory, PresetDescriptor, build_ffmpeg_cmd,
    builtin_formats, builtin_presets, format_ffmpeg_cmd, merge_presets, probe_duration,
    run_ffmpeg,
};
use super::events::ProgressEmitter;
use crate::config::Config;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;

/// How long a new conversion waits for a cancelled one to finish tearing down
const RELEASE_WAIT: Duration = Duration::from_secs(3);

/// Errors surfaced by backend calls. `Display` is the user-facing message.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Failed(String),

    #[error("Conversion cancelled")]
    Cancelled,

    #[error("Failed to start ffmpeg: {0}")]
    Spawn(#[source] io::Error),

    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Request/response surface of the conversion engine.
///
/// Calls block; the worker bridge runs them off the UI thread.
pub trait Backend: Send + Sync {
    fn get_supported_formats(&self) -> Result<Vec<FormatDescriptor>, BackendError>;

    fn get_presets(&self) -> Result<Vec<PresetDescriptor>, BackendError>;

    /// Run one conversion to completion, emitting samples on `progress`
    fn convert_media(
        &self,
        request: &ConversionRequest,
        progress: &ProgressEmitter,
    ) -> Result<String, BackendError>;

    /// Request termination of the running conversion, if any
    fn cancel_conversion(&self) -> Result<(), BackendError>;
}

struct ActiveConversion {
    pid: Option<u32>,
    cancel: Arc<AtomicBool>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(unix)]
fn terminate(pid: u32) -> io::Result<()> {
    // SIGTERM lets ffmpeg finalize the container before exiting
    let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
    if rc == 0 {
        return Ok(());
    }
    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        // Already gone
        Ok(())
    } else {
        Err(err)
    }
}

#[cfg(not(unix))]
fn terminate(_pid: u32) -> io::Result<()> {
    // The read loop kills the child once it sees the cancel flag
    Ok(())
}

pub struct FfmpegBackend {
    ffmpeg: String,
    ffprobe: String,
    formats: Vec<FormatDescriptor>,
    presets: Vec<PresetDescriptor>,
    active: Mutex<Option<ActiveConversion>>,
    released: Condvar,
}

impl FfmpegBackend {
    pub fn new(ffmpeg: impl Into<String>, ffprobe: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
            formats: builtin_formats(),
            presets: builtin_presets(),
            active: Mutex::new(None),
            released: Condvar::new(),
        }
    }

    /// Backend using the configured binaries, with user presets appended
    pub fn from_config(config: &Config) -> Self {
        let mut backend = Self::new(&config.backend.ffmpeg_path, &config.backend.ffprobe_path);
        backend.presets = merge_presets(backend.presets, &config.presets);
        backend
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.ffmpeg
    }

    /// Category of the target container, if the format is known
    pub fn category_of(&self, format: &str) -> Option<MediaCategory> {
        self.formats
            .iter()
            .find(|f| f.canonical_extension() == Some(format))
            .map(|f| f.category)
    }

    /// Build the ffmpeg invocation for a request without running it
    pub fn command_line(&self, request: &ConversionRequest) -> Result<String, BackendError> {
        let category = self.check_request(request, false)?;
        Ok(format_ffmpeg_cmd(&build_ffmpeg_cmd(
            &self.ffmpeg,
            request,
            category,
        )))
    }

    fn check_request(
        &self,
        request: &ConversionRequest,
        require_input: bool,
    ) -> Result<MediaCategory, BackendError> {
        if request.input_path.trim().is_empty() {
            return Err(BackendError::Rejected("No input file given".to_string()));
        }
        if request.output_path.trim().is_empty() {
            return Err(BackendError::Rejected("No output file given".to_string()));
        }
        if Path::new(&request.input_path) == Path::new(&request.output_path) {
            return Err(BackendError::Rejected(
                "Output file must differ from the input file".to_string(),
            ));
        }
        if require_input && !Path::new(&request.input_path).is_file() {
            return Err(BackendError::Rejected(format!(
                "Input file not found: {}",
                request.input_path
            )));
        }
        self.category_of(&request.format).ok_or_else(|| {
            BackendError::Rejected(format!("Unsupported format: {}", request.format))
        })
    }

    /// Claim the single conversion slot.
    ///
    /// A conversion that was cancelled but whose ffmpeg is still exiting is
    /// waited for, up to `RELEASE_WAIT`.
    fn register(&self) -> Result<Arc<AtomicBool>, BackendError> {
        let active = lock(&self.active);
        let (mut active, _) = self
            .released
            .wait_timeout_while(active, RELEASE_WAIT, |active| {
                active
                    .as_ref()
                    .is_some_and(|a| a.cancel.load(Ordering::SeqCst))
            })
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = active.as_ref() {
            let message = if previous.cancel.load(Ordering::SeqCst) {
                "The previous conversion is still stopping"
            } else {
                "A conversion is already running"
            };
            return Err(BackendError::Rejected(message.to_string()));
        }

        let cancel = Arc::new(AtomicBool::new(false));
        *active = Some(ActiveConversion {
            pid: None,
            cancel: cancel.clone(),
        });
        Ok(cancel)
    }

    fn run_registered(
        &self,
        request: &ConversionRequest,
        category: MediaCategory,
        cancel: &AtomicBool,
        progress: &ProgressEmitter,
    ) -> Result<String, BackendError> {
        let output = Path::new(&request.output_path);
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let duration_s = match probe_duration(&self.ffprobe, Path::new(&request.input_path)) {
            Ok(duration) => Some(duration),
            Err(e) => {
                tracing::debug!(error = %format!("{:#}", e), "duration probe failed, percentage unavailable");
                None
            }
        };

        if cancel.load(Ordering::SeqCst) {
            tracing::info!(output = %request.output_path, "cancelled before ffmpeg started");
            return Err(BackendError::Cancelled);
        }

        let cmd = build_ffmpeg_cmd(&self.ffmpeg, request, category);
        tracing::info!(command = %format_ffmpeg_cmd(&cmd), "starting ffmpeg");

        let run = run_ffmpeg(
            cmd,
            duration_s,
            cancel,
            &mut |pid| {
                if let Some(active) = lock(&self.active).as_mut() {
                    active.pid = Some(pid);
                    // Cancelled between the check above and the spawn
                    if active.cancel.load(Ordering::SeqCst) {
                        if let Err(e) = terminate(pid) {
                            tracing::warn!(error = %e, pid, "failed to signal ffmpeg");
                        }
                    }
                }
            },
            &mut |sample| progress.emit(sample),
        )
        .map_err(BackendError::Spawn)?;

        if run.cancelled {
            tracing::info!(output = %request.output_path, "ffmpeg stopped on request");
            return Err(BackendError::Cancelled);
        }
        if !run.status.success() {
            return Err(BackendError::Failed(format!(
                "ffmpeg exited with {}: {}",
                run.status, run.stderr_tail
            )));
        }

        Ok(format!("Conversion complete: {}", request.output_path))
    }
}

impl Backend for FfmpegBackend {
    fn get_supported_formats(&self) -> Result<Vec<FormatDescriptor>, BackendError> {
        Ok(self.formats.clone())
    }

    fn get_presets(&self) -> Result<Vec<PresetDescriptor>, BackendError> {
        Ok(self.presets.clone())
    }

    fn convert_media(
        &self,
        request: &ConversionRequest,
        progress: &ProgressEmitter,
    ) -> Result<String, BackendError> {
        let category = self.check_request(request, true)?;
        let cancel = self.register()?;

        let result = self.run_registered(request, category, &cancel, progress);

        *lock(&self.active) = None;
        self.released.notify_all();
        result
    }

    fn cancel_conversion(&self) -> Result<(), BackendError> {
        let active = lock(&self.active);
        let Some(conversion) = active.as_ref() else {
            tracing::debug!("cancel requested with no conversion running");
            return Ok(());
        };

        conversion.cancel.store(true, Ordering::SeqCst);
        if let Some(pid) = conversion.pid {
            terminate(pid)?;
        }
        Ok(())
    }
}
