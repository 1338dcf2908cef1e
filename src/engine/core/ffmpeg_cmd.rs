use super::types::{ConversionRequest, MediaCategory, ProgressParser, ProgressSample};
use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};

/// Lines of ffmpeg stderr kept for error reporting
const STDERR_TAIL_LINES: usize = 12;

/// Check if ffmpeg stopped because it was signalled (SIGINT, SIGQUIT, SIGTERM).
///
/// ffmpeg usually catches the signal and exits on its own, printing
/// "Exiting normally, received signal X", so stderr is checked as well.
#[cfg(unix)]
fn was_user_cancelled(status: &ExitStatus, stderr: &str) -> bool {
    use std::os::unix::process::ExitStatusExt;

    if let Some(signal) = status.signal() {
        if matches!(signal, 2 | 3 | 9 | 15) {
            return true;
        }
    }

    stderr.contains("received signal 2")
        || stderr.contains("received signal 3")
        || stderr.contains("received signal 15")
}

#[cfg(not(unix))]
fn was_user_cancelled(_status: &ExitStatus, stderr: &str) -> bool {
    stderr.contains("received signal")
}

/// Encoders that understand `-crf`
fn supports_crf(codec: &str) -> bool {
    matches!(
        codec,
        "libx264" | "libx265" | "libvpx-vp9" | "libvpx" | "libaom-av1" | "libsvtav1"
    )
}

/// Encoders that understand the x264/x265 speed `-preset`
fn supports_speed_preset(codec: &str) -> bool {
    matches!(codec, "libx264" | "libx265")
}

fn push_opt(args: &mut Vec<String>, flag: &str, value: Option<&String>) {
    if let Some(value) = value {
        args.push(flag.to_string());
        args.push(value.clone());
    }
}

/// Build the ffmpeg argument list for a request.
///
/// Quick-mode requests carry no encoder fields, so ffmpeg picks the container
/// defaults. Video options are dropped for audio targets and for `copy` video,
/// `-b:a` is dropped for `copy` audio.
pub fn ffmpeg_args(request: &ConversionRequest, category: MediaCategory) -> Vec<String> {
    let mut args: Vec<String> = ["-hide_banner", "-nostdin", "-y", "-i"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    args.push(request.input_path.clone());
    args.extend(["-progress", "pipe:1", "-nostats"].iter().map(|s| s.to_string()));

    match category {
        MediaCategory::Audio => args.push("-vn".to_string()),
        MediaCategory::Video => {
            let vcodec = request.video_codec.as_deref();
            push_opt(&mut args, "-c:v", request.video_codec.as_ref());

            if vcodec != Some("copy") {
                push_opt(&mut args, "-b:v", request.video_bitrate.as_ref());
                push_opt(&mut args, "-s", request.resolution.as_ref());
                push_opt(&mut args, "-r", request.fps.as_ref());

                // Without an explicit codec ffmpeg's default encoder decides; only
                // pass encoder-private options when we know they apply
                if vcodec.is_none_or(supports_crf) {
                    push_opt(&mut args, "-crf", request.quality.as_ref());
                }
                if vcodec.is_none_or(supports_speed_preset) {
                    push_opt(&mut args, "-preset", request.preset.as_ref());
                }
            }
        }
    }

    push_opt(&mut args, "-c:a", request.audio_codec.as_ref());
    if request.audio_codec.as_deref() != Some("copy") {
        push_opt(&mut args, "-b:a", request.audio_bitrate.as_ref());
    }

    args.push(request.output_path.clone());
    args
}

pub fn build_ffmpeg_cmd(ffmpeg: &str, request: &ConversionRequest, category: MediaCategory) -> Command {
    let mut cmd = Command::new(ffmpeg);
    cmd.args(ffmpeg_args(request, category));
    cmd
}

/// Render a command as a shell-quoted string for logs and dry runs
pub fn format_ffmpeg_cmd(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().to_string()];
    parts.extend(cmd.get_args().map(|a| a.to_string_lossy().to_string()));

    shlex::try_join(parts.iter().map(String::as_str)).unwrap_or_else(|_| parts.join(" "))
}

/// Result of one ffmpeg run
#[derive(Debug)]
pub struct FfmpegRun {
    pub status: ExitStatus,
    pub stderr_tail: String,
    pub cancelled: bool,
}

/// Spawn ffmpeg and stream its `-progress` output.
///
/// `on_spawn` receives the child PID so the caller can signal it. One sample is
/// emitted per progress block. When `cancel` is raised the child is killed at the
/// next line of output.
pub fn run_ffmpeg(
    mut cmd: Command,
    duration_s: Option<f64>,
    cancel: &AtomicBool,
    on_spawn: &mut dyn FnMut(u32),
    on_sample: &mut dyn FnMut(ProgressSample),
) -> io::Result<FfmpegRun> {
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn()?;
    on_spawn(child.id());

    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("Failed to capture ffmpeg stderr"))?;
    let stderr_thread = std::thread::spawn(move || {
        let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
        for line in BufReader::new(stderr).lines().map_while(Result::ok) {
            if line.trim().is_empty() {
                continue;
            }
            if tail.len() == STDERR_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line);
        }
        Vec::from(tail).join("\n")
    });

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("Failed to capture ffmpeg stdout"))?;
    let mut parser = ProgressParser::new();
    let mut killed = false;

    for line in BufReader::new(stdout).lines().map_while(Result::ok) {
        if cancel.load(Ordering::SeqCst) {
            if !killed {
                let _ = child.kill();
                killed = true;
            }
            continue;
        }
        if parser.parse_line(&line) {
            on_sample(parser.sample(duration_s));
        }
    }

    if cancel.load(Ordering::SeqCst) && !killed {
        let _ = child.kill();
    }

    let status = child.wait()?;
    let stderr_tail = stderr_thread
        .join()
        .unwrap_or_else(|_| "Failed to capture stderr".to_string());

    let cancelled = cancel.load(Ordering::SeqCst) || was_user_cancelled(&status, &stderr_tail);

    Ok(FfmpegRun {
        status,
        stderr_tail,
        cancelled,
    })
}
