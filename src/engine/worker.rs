// Bridge that runs blocking backend calls on background threads

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use super::backend::Backend;
use super::core::{ConversionRequest, FormatDescriptor, PresetDescriptor, ProgressSample};
use super::events::{ProgressEmitter, progress_channel};
use crate::control::job::{Dispatch, JobTicket};

/// Resolution of a backend call, delivered back to the UI thread
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// `get_supported_formats` finished
    FormatsLoaded(Result<Vec<FormatDescriptor>, String>),

    /// `get_presets` finished
    PresetsLoaded(Result<Vec<PresetDescriptor>, String>),

    /// `convert_media` for the given submit call finished
    ConvertResolved {
        ticket: JobTicket,
        result: Result<String, String>,
    },

    /// `cancel_conversion` finished
    CancelResolved(Result<(), String>),
}

/// Owns the receiving ends of the backend channels
pub struct Worker {
    handle: WorkerHandle,
    rx: Receiver<BackendEvent>,
    progress_rx: Option<Receiver<ProgressSample>>,
}

impl Worker {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (tx, rx) = mpsc::channel();
        let (progress, progress_rx) = progress_channel();

        Self {
            handle: WorkerHandle {
                backend,
                tx,
                progress,
            },
            rx,
            progress_rx: Some(progress_rx),
        }
    }

    /// Get the receiver for call resolutions
    pub fn receiver(&self) -> &Receiver<BackendEvent> {
        &self.rx
    }

    /// Hand out the `conversion-progress` receiver (once)
    pub fn take_progress_receiver(&mut self) -> Option<Receiver<ProgressSample>> {
        self.progress_rx.take()
    }

    pub fn handle(&self) -> WorkerHandle {
        self.handle.clone()
    }
}

/// Cloneable sender side used to start backend calls
#[derive(Clone)]
pub struct WorkerHandle {
    backend: Arc<dyn Backend>,
    tx: Sender<BackendEvent>,
    progress: ProgressEmitter,
}

impl WorkerHandle {
    fn spawn<F>(&self, name: &str, task: F, on_spawn_error: BackendEvent)
    where
        F: FnOnce(Arc<dyn Backend>, Sender<BackendEvent>) + Send + 'static,
    {
        let backend = self.backend.clone();
        let tx = self.tx.clone();

        let spawned = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || task(backend, tx));

        if let Err(e) = spawned {
            tracing::error!(thread = name, error = %e, "failed to spawn backend thread");
            let _ = self.tx.send(on_spawn_error);
        }
    }

    /// Fetch formats and presets; each resolves independently
    pub fn fetch_catalog(&self) {
        self.spawn(
            "mediaconv-formats",
            |backend, tx| {
                let result = backend.get_supported_formats().map_err(|e| e.to_string());
                let _ = tx.send(BackendEvent::FormatsLoaded(result));
            },
            BackendEvent::FormatsLoaded(Err("could not start catalog fetch".to_string())),
        );
        self.spawn(
            "mediaconv-presets",
            |backend, tx| {
                let result = backend.get_presets().map_err(|e| e.to_string());
                let _ = tx.send(BackendEvent::PresetsLoaded(result));
            },
            BackendEvent::PresetsLoaded(Err("could not start catalog fetch".to_string())),
        );
    }
}

impl Dispatch for WorkerHandle {
    fn submit(&self, ticket: JobTicket, request: ConversionRequest) {
        let progress = self.progress.clone();
        self.spawn(
            "mediaconv-convert",
            move |backend, tx| {
                let result = backend
                    .convert_media(&request, &progress)
                    .map_err(|e| e.to_string());
                let _ = tx.send(BackendEvent::ConvertResolved { ticket, result });
            },
            BackendEvent::ConvertResolved {
                ticket,
                result: Err("Could not start the conversion thread".to_string()),
            },
        );
    }

    fn cancel(&self) {
        self.spawn(
            "mediaconv-cancel",
            |backend, tx| {
                let result = backend.cancel_conversion().map_err(|e| e.to_string());
                let _ = tx.send(BackendEvent::CancelResolved(result));
            },
            BackendEvent::CancelResolved(Err("could not start cancel thread".to_string())),
        );
    }
}
