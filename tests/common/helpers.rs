#![allow(dead_code)]

use mediaconv::control::{Dispatch, JobTicket};
use mediaconv::engine::{
    Backend, BackendError, BackendEvent, ConversionRequest, FormatDescriptor, PresetDescriptor,
    ProgressEmitter, ProgressSample, builtin_formats, builtin_presets,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::Receiver;
use std::thread;
use std::time::{Duration, Instant};

/// How long tests wait for a bridge thread before giving up
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Backend that replays canned answers instead of running ffmpeg
pub struct ScriptedBackend {
    formats: Result<Vec<FormatDescriptor>, String>,
    presets: Result<Vec<PresetDescriptor>, String>,
    samples: Vec<ProgressSample>,
    outcome: Result<String, String>,
    hold_until_cancel: bool,
    cancelled: AtomicBool,
    started: AtomicBool,
    pub converted: Mutex<Vec<ConversionRequest>>,
    pub cancel_calls: AtomicUsize,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            formats: Ok(builtin_formats()),
            presets: Ok(builtin_presets()),
            samples: Vec::new(),
            outcome: Ok("Conversion complete".to_string()),
            hold_until_cancel: false,
            cancelled: AtomicBool::new(false),
            started: AtomicBool::new(false),
            converted: Mutex::new(Vec::new()),
            cancel_calls: AtomicUsize::new(0),
        }
    }
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples(mut self, percentages: &[f32]) -> Self {
        self.samples = percentages.iter().map(|p| sample(*p)).collect();
        self
    }

    pub fn failing_formats(mut self, message: &str) -> Self {
        self.formats = Err(message.to_string());
        self
    }

    pub fn failing_presets(mut self, message: &str) -> Self {
        self.presets = Err(message.to_string());
        self
    }

    pub fn failing_with(mut self, message: &str) -> Self {
        self.outcome = Err(message.to_string());
        self
    }

    /// Keep `convert_media` running until `cancel_conversion` is called
    pub fn holding(mut self) -> Self {
        self.hold_until_cancel = true;
        self
    }

    pub fn has_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn converted_requests(&self) -> Vec<ConversionRequest> {
        self.converted.lock().unwrap().clone()
    }
}

impl Backend for ScriptedBackend {
    fn get_supported_formats(&self) -> Result<Vec<FormatDescriptor>, BackendError> {
        self.formats.clone().map_err(BackendError::Failed)
    }

    fn get_presets(&self) -> Result<Vec<PresetDescriptor>, BackendError> {
        self.presets.clone().map_err(BackendError::Failed)
    }

    fn convert_media(
        &self,
        request: &ConversionRequest,
        progress: &ProgressEmitter,
    ) -> Result<String, BackendError> {
        self.converted.lock().unwrap().push(request.clone());
        for s in &self.samples {
            progress.emit(s.clone());
        }
        self.started.store(true, Ordering::SeqCst);

        if self.hold_until_cancel {
            let deadline = Instant::now() + EVENT_TIMEOUT;
            while !self.cancelled.load(Ordering::SeqCst) && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(5));
            }
            if self.cancelled.load(Ordering::SeqCst) {
                return Err(BackendError::Cancelled);
            }
        }

        self.outcome.clone().map_err(BackendError::Failed)
    }

    fn cancel_conversion(&self) -> Result<(), BackendError> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        self.cancelled.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Dispatcher that only records what the controller asked for
#[derive(Default)]
pub struct RecordingDispatch {
    pub submitted: RefCell<Vec<(JobTicket, ConversionRequest)>>,
    pub cancels: RefCell<usize>,
}

impl Dispatch for RecordingDispatch {
    fn submit(&self, ticket: JobTicket, request: ConversionRequest) {
        self.submitted.borrow_mut().push((ticket, request));
    }

    fn cancel(&self) {
        *self.cancels.borrow_mut() += 1;
    }
}

impl RecordingDispatch {
    pub fn last_ticket(&self) -> JobTicket {
        self.submitted.borrow().last().expect("nothing submitted").0
    }
}

pub fn sample(percentage: f32) -> ProgressSample {
    ProgressSample {
        percentage,
        time: format!("{:.1}s", percentage / 10.0),
        speed: "1.00x".to_string(),
        bitrate: "N/A".to_string(),
    }
}

/// Create an (empty) input file with the given name
pub fn media_fixture(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"not really media").expect("write fixture");
    path
}

/// Wait for the next event matching `pred`, skipping others
pub fn wait_for<F>(rx: &Receiver<BackendEvent>, mut pred: F) -> BackendEvent
where
    F: FnMut(&BackendEvent) -> bool,
{
    let deadline = Instant::now() + EVENT_TIMEOUT;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let event = rx
            .recv_timeout(remaining)
            .expect("timed out waiting for backend event");
        if pred(&event) {
            return event;
        }
    }
}

/// Poll until `check` holds or the timeout expires
pub fn wait_until<F: Fn() -> bool>(check: F) -> bool {
    let deadline = Instant::now() + EVENT_TIMEOUT;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    check()
}

/// Executable shell script standing in for ffmpeg or ffprobe
#[cfg(unix)]
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "#!/bin/sh").unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file.sync_all().unwrap();
    drop(file);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
