use std::path::{Path, PathBuf};

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm", "flv", "wmv", "m4v"];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "aac", "ogg", "wma", "m4a", "opus"];

/// Extensions accepted by the input picker, video first
pub fn media_extensions() -> impl Iterator<Item = &'static str> {
    VIDEO_EXTENSIONS.iter().chain(AUDIO_EXTENSIONS.iter()).copied()
}

/// Check if a path has an allow-listed media extension
pub fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            media_extensions().any(|allowed| allowed == ext)
        })
        .unwrap_or(false)
}

/// Suggest an output path next to the input.
///
/// `pattern` supports `{basename}`, `{filename}` and `{ext}`. When the suggestion
/// would collide with the input itself, `_converted` is appended to the stem.
pub fn derive_output_path(input_path: &Path, extension: &str, pattern: Option<&str>) -> PathBuf {
    let output_dir = input_path.parent().unwrap_or_else(|| Path::new("."));

    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let original_filename = input_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let base = match pattern {
        Some(pat) if !pat.trim().is_empty() => pat
            .replace("{basename}", stem)
            .replace("{filename}", original_filename)
            .replace("{ext}", extension),
        _ => stem.to_string(),
    };

    let suffix = format!(".{}", extension);
    let file_name = if base.ends_with(&suffix) {
        base.clone()
    } else {
        format!("{}{}", base, suffix)
    };

    let candidate = output_dir.join(&file_name);
    if candidate == input_path {
        let stem = file_name.strip_suffix(&suffix).unwrap_or(&file_name);
        output_dir.join(format!("{}_converted{}", stem, suffix))
    } else {
        candidate
    }
}

/// Constrain a chosen destination to the target extension, appending it when missing
pub fn with_target_extension(path: PathBuf, extension: &str) -> PathBuf {
    let matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension));

    if matches || extension.is_empty() {
        path
    } else {
        let mut raw = path.into_os_string();
        raw.push(".");
        raw.push(extension);
        PathBuf::from(raw)
    }
}
