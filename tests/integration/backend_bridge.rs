// Worker bridge end to end with a scripted backend

use mediaconv::control::{CatalogStore, JobController, JobOutcome, ProgressSubscriber};
use mediaconv::engine::{BackendEvent, ConversionRequest, Worker};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tempfile::TempDir;

use crate::common::helpers::*;

struct Harness {
    backend: Arc<ScriptedBackend>,
    worker: Worker,
    job: JobController<mediaconv::engine::WorkerHandle>,
    progress: ProgressSubscriber,
}

impl Harness {
    fn new(backend: ScriptedBackend) -> Self {
        let backend = Arc::new(backend);
        let mut worker = Worker::new(backend.clone());
        let progress = worker
            .take_progress_receiver()
            .map(ProgressSubscriber::subscribe)
            .unwrap();
        let job = JobController::new(worker.handle());
        Self {
            backend,
            worker,
            job,
            progress,
        }
    }

    /// Pump events until the submit resolution arrives; returns the outcome and
    /// how many progress samples the controller accepted
    fn run_to_resolution(&mut self) -> (Option<JobOutcome>, usize) {
        let event = wait_for(self.worker.receiver(), |e| {
            matches!(e, BackendEvent::ConvertResolved { .. })
        });
        // Samples are emitted before the resolution is sent
        let applied = self.progress.drain(&mut self.job);

        let BackendEvent::ConvertResolved { ticket, result } = event else {
            unreachable!()
        };
        (self.job.on_submit_resolved(ticket, result), applied)
    }
}

fn request(dir: &TempDir) -> ConversionRequest {
    ConversionRequest {
        input_path: media_fixture(dir.path(), "in.mov").to_string_lossy().to_string(),
        output_path: dir.path().join("out.mp4").to_string_lossy().to_string(),
        format: "mp4".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_fetch_catalog_resolves_both_lists() {
    let harness = Harness::new(ScriptedBackend::new().failing_presets("no presets"));
    harness.worker.handle().fetch_catalog();

    let mut catalog = CatalogStore::new();
    for _ in 0..2 {
        match wait_for(harness.worker.receiver(), |_| true) {
            BackendEvent::FormatsLoaded(result) => catalog.load_formats(result),
            BackendEvent::PresetsLoaded(result) => {
                assert_eq!(result.as_ref().unwrap_err(), "no presets");
                catalog.load_presets(result)
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    assert!(catalog.is_loaded());
    assert_eq!(catalog.formats().len(), 16);
    assert!(catalog.presets().is_empty());
}

#[test]
fn test_conversion_reports_progress_then_completes() {
    let dir = TempDir::new().unwrap();
    let mut harness = Harness::new(ScriptedBackend::new().with_samples(&[10.0, 50.0, 100.0]));

    harness.job.submit(request(&dir)).unwrap();
    let (outcome, applied) = harness.run_to_resolution();

    assert_eq!(applied, 3);
    assert_eq!(
        outcome,
        Some(JobOutcome::Completed("Conversion complete".to_string()))
    );
    assert!(harness.job.is_idle());

    let sent = harness.backend.converted_requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].format, "mp4");
}

#[test]
fn test_backend_failure_surfaces_verbatim() {
    let dir = TempDir::new().unwrap();
    let mut harness = Harness::new(ScriptedBackend::new().failing_with("disk full"));

    harness.job.submit(request(&dir)).unwrap();
    let (outcome, _) = harness.run_to_resolution();

    assert_eq!(outcome, Some(JobOutcome::Failed("disk full".to_string())));
}

#[test]
fn test_cancel_reaches_backend_and_late_result_is_dropped() {
    let dir = TempDir::new().unwrap();
    let mut harness = Harness::new(ScriptedBackend::new().with_samples(&[20.0]).holding());

    harness.job.submit(request(&dir)).unwrap();
    let backend = harness.backend.clone();
    assert!(wait_until(|| backend.has_started()));
    harness.progress.drain(&mut harness.job);
    assert!(harness.job.is_active());

    assert_eq!(harness.job.cancel(), Some(JobOutcome::Cancelled));
    assert!(harness.job.is_idle());

    let mut cancel_result = None;
    let mut late = None;
    while cancel_result.is_none() || late.is_none() {
        match wait_for(harness.worker.receiver(), |_| true) {
            BackendEvent::CancelResolved(result) => cancel_result = Some(result),
            BackendEvent::ConvertResolved { ticket, result } => {
                late = Some(harness.job.on_submit_resolved(ticket, result))
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    assert_eq!(cancel_result, Some(Ok(())));
    harness.job.on_cancel_resolved(Ok(()));
    assert_eq!(late, Some(None));
    assert_eq!(harness.backend.cancel_calls.load(Ordering::SeqCst), 1);
    assert!(harness.job.is_idle());
}
