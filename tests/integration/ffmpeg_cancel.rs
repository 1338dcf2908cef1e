// Cancellation and failure paths of FfmpegBackend, driven by shell-script
// stand-ins for ffmpeg and ffprobe so they run without ffmpeg installed.
#![cfg(unix)]

use mediaconv::engine::{
    Backend, BackendError, ConversionRequest, FfmpegBackend, ProgressEmitter, progress_channel,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

use crate::common::helpers::*;

const QUICK_PROBE: &str = "echo '{\"format\":{\"duration\":\"10.0\"}}'\n";

/// Writes the output file and reports completion
const QUICK_FFMPEG: &str = r#"for a; do out=$a; done
echo "out_time_us=10000000"
echo "progress=end"
: > "$out"
"#;

/// Streams progress while `hold` exists in its directory
fn streaming_ffmpeg(hold: &Path) -> String {
    format!(
        r#"for a; do out=$a; done
i=0
while [ -f '{}' ] && [ $i -lt 100 ]; do
  i=$((i+1))
  echo "out_time_us=${{i}}00000"
  echo "progress=continue"
  sleep 0.1
done
echo "out_time_us=10000000"
echo "progress=end"
: > "$out"
"#,
        hold.display()
    )
}

fn request(dir: &Path) -> (ConversionRequest, PathBuf) {
    let input = media_fixture(dir, "clip.mov");
    let output = dir.join("out").join("clip.mp4");
    let request = ConversionRequest {
        input_path: input.to_string_lossy().to_string(),
        output_path: output.to_string_lossy().to_string(),
        format: "mp4".to_string(),
        ..Default::default()
    };
    (request, output)
}

fn backend(ffmpeg: &Path, ffprobe: &Path) -> Arc<FfmpegBackend> {
    Arc::new(FfmpegBackend::new(
        ffmpeg.to_string_lossy(),
        ffprobe.to_string_lossy(),
    ))
}

#[test]
fn test_cancel_during_duration_probe_stops_before_ffmpeg() {
    let dir = TempDir::new().unwrap();
    let ffprobe = fake_tool(dir.path(), "slowprobe", &format!("sleep 1\n{QUICK_PROBE}"));
    let ffmpeg = fake_tool(dir.path(), "ffmpeg", QUICK_FFMPEG);
    let backend = backend(&ffmpeg, &ffprobe);
    let (request, output) = request(dir.path());

    let runner = {
        let backend = backend.clone();
        thread::spawn(move || backend.convert_media(&request, &ProgressEmitter::disconnected()))
    };

    thread::sleep(Duration::from_millis(300));
    backend.cancel_conversion().unwrap();

    let result = runner.join().unwrap();
    assert!(matches!(result, Err(BackendError::Cancelled)), "{result:?}");
    assert!(!output.exists());
}

#[test]
fn test_cancel_while_streaming_and_restart_right_away() {
    let dir = TempDir::new().unwrap();
    let hold = dir.path().join("hold");
    std::fs::write(&hold, b"").unwrap();
    let ffprobe = fake_tool(dir.path(), "ffprobe", QUICK_PROBE);
    let ffmpeg = fake_tool(dir.path(), "ffmpeg", &streaming_ffmpeg(&hold));
    let backend = backend(&ffmpeg, &ffprobe);
    let (request, output) = request(dir.path());

    let (emitter, samples) = progress_channel();
    let runner = {
        let backend = backend.clone();
        let request = request.clone();
        thread::spawn(move || backend.convert_media(&request, &emitter))
    };

    let first = samples.recv_timeout(EVENT_TIMEOUT).unwrap();
    assert!(first.percentage > 0.0 && first.percentage < 100.0);

    backend.cancel_conversion().unwrap();
    std::fs::remove_file(&hold).unwrap();

    // The slot is released once the signalled ffmpeg exits
    let again = backend.convert_media(&request, &ProgressEmitter::disconnected());
    assert_eq!(
        again.unwrap(),
        format!("Conversion complete: {}", output.display())
    );

    let cancelled = runner.join().unwrap();
    assert!(matches!(cancelled, Err(BackendError::Cancelled)), "{cancelled:?}");
}

#[test]
fn test_nonzero_exit_carries_stderr_tail() {
    let dir = TempDir::new().unwrap();
    let ffprobe = fake_tool(dir.path(), "ffprobe", QUICK_PROBE);
    let ffmpeg = fake_tool(
        dir.path(),
        "ffmpeg",
        "echo 'Input #0, mov' >&2\necho \"Unknown encoder 'libnothing'\" >&2\nexit 1\n",
    );
    let backend = backend(&ffmpeg, &ffprobe);
    let (request, _) = request(dir.path());

    let err = backend
        .convert_media(&request, &ProgressEmitter::disconnected())
        .unwrap_err();
    let BackendError::Failed(message) = err else {
        panic!("expected a failure, got {err:?}");
    };
    assert!(message.starts_with("ffmpeg exited with"), "{message}");
    assert!(message.contains("Unknown encoder 'libnothing'"), "{message}");

    // A failed run frees the slot
    assert!(matches!(
        backend.convert_media(&request, &ProgressEmitter::disconnected()),
        Err(BackendError::Failed(_))
    ));
}

#[test]
fn test_second_conversion_is_rejected_while_one_runs() {
    let dir = TempDir::new().unwrap();
    let hold = dir.path().join("hold");
    std::fs::write(&hold, b"").unwrap();
    let ffprobe = fake_tool(dir.path(), "ffprobe", QUICK_PROBE);
    let ffmpeg = fake_tool(dir.path(), "ffmpeg", &streaming_ffmpeg(&hold));
    let backend = backend(&ffmpeg, &ffprobe);
    let (request, _) = request(dir.path());

    let (emitter, samples) = progress_channel();
    let runner = {
        let backend = backend.clone();
        let request = request.clone();
        thread::spawn(move || backend.convert_media(&request, &emitter))
    };
    samples.recv_timeout(EVENT_TIMEOUT).unwrap();

    let err = backend
        .convert_media(&request, &ProgressEmitter::disconnected())
        .unwrap_err();
    assert_eq!(err.to_string(), "A conversion is already running");

    std::fs::remove_file(&hold).unwrap();
    assert!(runner.join().unwrap().is_ok());
}
