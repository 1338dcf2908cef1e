mod catalog;
mod ffmpeg_cmd;
mod ffmpeg_info;
mod paths;
mod types;

pub use catalog::{builtin_formats, builtin_presets, merge_presets};
pub use ffmpeg_cmd::{FfmpegRun, build_ffmpeg_cmd, ffmpeg_args, format_ffmpeg_cmd, run_ffmpeg};
pub use ffmpeg_info::{ffmpeg_version, ffprobe_version, parse_ffprobe_duration, probe_duration};
pub use paths::{
    AUDIO_EXTENSIONS, VIDEO_EXTENSIONS, derive_output_path, is_media_file, media_extensions,
    with_target_extension,
};
pub use types::{
    ConversionRequest, FormatDescriptor, MediaCategory, PresetDescriptor, PresetSettings,
    ProgressParser, ProgressSample, SPEED_PRESETS,
};
