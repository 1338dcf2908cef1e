// Built-in format table and presets served by the backend

use super::types::{FormatDescriptor, MediaCategory, PresetDescriptor, PresetSettings};

pub fn builtin_formats() -> Vec<FormatDescriptor> {
    use MediaCategory::{Audio, Video};

    vec![
        // Video formats
        FormatDescriptor::new("MP4", &["mp4"], "MPEG-4 Part 14 - most widely supported", Video),
        FormatDescriptor::new("AVI", &["avi"], "Audio Video Interleave", Video),
        FormatDescriptor::new("MKV", &["mkv"], "Matroska Video - high quality", Video),
        FormatDescriptor::new("MOV", &["mov"], "QuickTime Movie", Video),
        FormatDescriptor::new("WEBM", &["webm"], "Web video format", Video),
        FormatDescriptor::new("FLV", &["flv"], "Flash Video", Video),
        FormatDescriptor::new("WMV", &["wmv"], "Windows Media Video", Video),
        FormatDescriptor::new("M4V", &["m4v"], "iTunes Video", Video),
        // Audio formats
        FormatDescriptor::new("MP3", &["mp3"], "MPEG Audio Layer 3", Audio),
        FormatDescriptor::new("WAV", &["wav"], "Waveform Audio - lossless", Audio),
        FormatDescriptor::new("FLAC", &["flac"], "Free Lossless Audio Codec", Audio),
        FormatDescriptor::new("AAC", &["aac"], "Advanced Audio Coding", Audio),
        FormatDescriptor::new("OGG", &["ogg"], "Ogg Vorbis", Audio),
        FormatDescriptor::new("WMA", &["wma"], "Windows Media Audio", Audio),
        FormatDescriptor::new("M4A", &["m4a"], "MPEG-4 Audio", Audio),
        FormatDescriptor::new("OPUS", &["opus"], "Opus Audio - modern codec", Audio),
    ]
}

fn some(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn preset(name: &str, description: &str, settings: PresetSettings) -> PresetDescriptor {
    PresetDescriptor {
        name: name.to_string(),
        description: description.to_string(),
        settings,
    }
}

pub fn builtin_presets() -> Vec<PresetDescriptor> {
    vec![
        preset(
            "High Quality Video",
            "Best picture quality",
            PresetSettings {
                format: "mp4".to_string(),
                video_codec: some("libx264"),
                audio_codec: some("aac"),
                video_bitrate: some("5000k"),
                audio_bitrate: some("320k"),
                resolution: None,
                fps: None,
                quality: some("18"),
                preset: some("slow"),
            },
        ),
        preset(
            "Web Optimized",
            "Small files tuned for the web",
            PresetSettings {
                format: "mp4".to_string(),
                video_codec: some("libx264"),
                audio_codec: some("aac"),
                video_bitrate: some("1500k"),
                audio_bitrate: some("128k"),
                resolution: some("1280x720"),
                fps: some("30"),
                quality: some("23"),
                preset: some("fast"),
            },
        ),
        preset(
            "Mobile Friendly",
            "Optimized for phones and tablets",
            PresetSettings {
                format: "mp4".to_string(),
                video_codec: some("libx264"),
                audio_codec: some("aac"),
                video_bitrate: some("800k"),
                audio_bitrate: some("96k"),
                resolution: some("854x480"),
                fps: some("24"),
                quality: some("28"),
                preset: some("veryfast"),
            },
        ),
        preset(
            "Extract Audio",
            "Create an audio file from a video",
            PresetSettings {
                format: "mp3".to_string(),
                audio_codec: some("libmp3lame"),
                audio_bitrate: some("320k"),
                ..Default::default()
            },
        ),
        preset(
            "Lossless Audio",
            "Highest audio quality",
            PresetSettings {
                format: "flac".to_string(),
                audio_codec: some("flac"),
                ..Default::default()
            },
        ),
        preset(
            "4K Video",
            "Ultra HD conversion",
            PresetSettings {
                format: "mp4".to_string(),
                video_codec: some("libx265"),
                audio_codec: some("aac"),
                video_bitrate: some("15000k"),
                audio_bitrate: some("320k"),
                resolution: some("3840x2160"),
                fps: some("60"),
                quality: some("20"),
                preset: some("slow"),
            },
        ),
    ]
}

/// Append user presets to the built-in list, skipping names that are already taken
pub fn merge_presets(
    mut presets: Vec<PresetDescriptor>,
    extra: &[PresetDescriptor],
) -> Vec<PresetDescriptor> {
    for user in extra {
        if presets.iter().any(|p| p.name == user.name) {
            tracing::warn!(preset = %user.name, "skipping user preset with duplicate name");
            continue;
        }
        presets.push(user.clone());
    }
    presets
}
