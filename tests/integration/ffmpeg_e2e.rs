// Real ffmpeg runs. Skipped when ffmpeg/ffprobe are not installed.

use mediaconv::control::{JobController, JobOutcome, ProgressSubscriber};
use mediaconv::engine::{
    Backend, BackendError, BackendEvent, ConversionRequest, FfmpegBackend, ProgressEmitter,
    Worker, ffmpeg_version, ffprobe_version, progress_channel,
};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use tempfile::TempDir;

use crate::common::helpers::*;

fn ffmpeg_available() -> bool {
    ffmpeg_version("ffmpeg").is_ok() && ffprobe_version("ffprobe").is_ok()
}

/// Two seconds of test pattern with a sine tone
fn generate_input(dir: &Path) -> Option<PathBuf> {
    let path = dir.join("pattern.mkv");
    let status = Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-y"])
        .args(["-f", "lavfi", "-i", "testsrc=duration=2:size=160x120:rate=10"])
        .args(["-f", "lavfi", "-i", "sine=frequency=440:duration=2"])
        .args(["-shortest"])
        .arg(&path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .ok()?;
    status.success().then_some(path)
}

fn request(input: &Path, output: &Path, format: &str) -> ConversionRequest {
    ConversionRequest {
        input_path: input.to_string_lossy().to_string(),
        output_path: output.to_string_lossy().to_string(),
        format: format.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_extract_audio_to_wav() {
    if !ffmpeg_available() {
        eprintln!("skipping: ffmpeg not installed");
        return;
    }
    let dir = TempDir::new().unwrap();
    let Some(input) = generate_input(dir.path()) else {
        eprintln!("skipping: could not generate test input");
        return;
    };
    let output = dir.path().join("out").join("tone.wav");

    let (emitter, rx) = progress_channel();
    let backend = FfmpegBackend::new("ffmpeg", "ffprobe");
    let message = backend
        .convert_media(&request(&input, &output, "wav"), &emitter)
        .unwrap();

    assert!(message.contains("tone.wav"));
    assert!(output.is_file());
    let samples: Vec<_> = rx.try_iter().collect();
    assert!(!samples.is_empty());
    assert!(samples.iter().all(|s| (0.0..=100.0).contains(&s.percentage)));
}

#[test]
fn test_missing_encoder_reports_ffmpeg_error() {
    if !ffmpeg_available() {
        eprintln!("skipping: ffmpeg not installed");
        return;
    }
    let dir = TempDir::new().unwrap();
    let Some(input) = generate_input(dir.path()) else {
        return;
    };
    let output = dir.path().join("broken.mp4");

    let mut req = request(&input, &output, "mp4");
    req.video_codec = Some("no-such-encoder".to_string());
    let err = FfmpegBackend::new("ffmpeg", "ffprobe")
        .convert_media(&req, &ProgressEmitter::disconnected())
        .unwrap_err();

    assert!(matches!(err, BackendError::Failed(_)));
    assert!(err.to_string().starts_with("ffmpeg exited with"));
}

#[test]
fn test_bridge_conversion_with_real_backend() {
    if !ffmpeg_available() {
        eprintln!("skipping: ffmpeg not installed");
        return;
    }
    let dir = TempDir::new().unwrap();
    let Some(input) = generate_input(dir.path()) else {
        return;
    };
    let output = dir.path().join("tone.flac");

    let mut worker = Worker::new(Arc::new(FfmpegBackend::new("ffmpeg", "ffprobe")));
    let mut progress = ProgressSubscriber::subscribe(worker.take_progress_receiver().unwrap());
    let mut job = JobController::new(worker.handle());

    job.submit(request(&input, &output, "flac")).unwrap();
    let BackendEvent::ConvertResolved { ticket, result } = wait_for(worker.receiver(), |e| {
        matches!(e, BackendEvent::ConvertResolved { .. })
    }) else {
        unreachable!()
    };
    progress.drain(&mut job);

    let outcome = job.on_submit_resolved(ticket, result);
    assert!(matches!(outcome, Some(JobOutcome::Completed(_))));
    assert!(output.is_file());
}
