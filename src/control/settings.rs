//! Conversion settings state and request resolution.
//!
//! `ConversionSettings` is the single owner of the user's selections. Every edit
//! goes through one of its mutation methods, and `resolve` turns the current
//! state into the canonical [`ConversionRequest`].

use crate::config::DefaultsConfig;
use crate::engine::{ConversionRequest, PresetDescriptor, SPEED_PRESETS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Only the target container is sent; the backend picks encoder defaults
    #[default]
    Quick,
    /// Every encoder parameter is sent explicitly
    Advanced,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Quick => Self::Advanced,
            Self::Advanced => Self::Quick,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Quick => "Quick",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    VideoCodec,
    AudioCodec,
    VideoBitrate,
    AudioBitrate,
    Resolution,
    Fps,
    Quality,
    SpeedPreset,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::VideoCodec,
        Field::AudioCodec,
        Field::VideoBitrate,
        Field::AudioBitrate,
        Field::Resolution,
        Field::Fps,
        Field::Quality,
        Field::SpeedPreset,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::VideoCodec => "Video codec",
            Self::AudioCodec => "Audio codec",
            Self::VideoBitrate => "Video bitrate",
            Self::AudioBitrate => "Audio bitrate",
            Self::Resolution => "Resolution",
            Self::Fps => "FPS",
            Self::Quality => "Quality (CRF)",
            Self::SpeedPreset => "Encoder preset",
        }
    }

    /// Suggested values for pickers; empty for free-text fields.
    /// An empty string option means "same as source".
    pub fn options(self) -> &'static [&'static str] {
        match self {
            Self::VideoCodec => &["libx264", "libx265", "libvpx-vp9", "copy"],
            Self::AudioCodec => &["aac", "libmp3lame", "libopus", "flac", "copy"],
            Self::Resolution => &["", "3840x2160", "2560x1440", "1920x1080", "1280x720", "854x480"],
            Self::Fps => &["", "24", "30", "60", "120"],
            Self::SpeedPreset => SPEED_PRESETS,
            Self::VideoBitrate | Self::AudioBitrate | Self::Quality => &[],
        }
    }

    /// Fields whose empty value means "preserve source" and is left out of requests
    pub fn is_optional(self) -> bool {
        matches!(self, Self::Resolution | Self::Fps)
    }
}

/// Advanced-mode field values, kept in memory across mode switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvancedFields {
    pub video_codec: String,
    pub audio_codec: String,
    pub video_bitrate: String,
    pub audio_bitrate: String,
    pub resolution: String,
    pub fps: String,
    pub quality: String,
    pub speed_preset: String,
}

impl Default for AdvancedFields {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            video_bitrate: "2000k".to_string(),
            audio_bitrate: "192k".to_string(),
            resolution: String::new(),
            fps: String::new(),
            quality: "23".to_string(),
            speed_preset: "medium".to_string(),
        }
    }
}

impl AdvancedFields {
    pub fn from_defaults(defaults: &DefaultsConfig) -> Self {
        Self {
            video_codec: defaults.video_codec.clone(),
            audio_codec: defaults.audio_codec.clone(),
            video_bitrate: defaults.video_bitrate.clone(),
            audio_bitrate: defaults.audio_bitrate.clone(),
            resolution: defaults.resolution.clone(),
            fps: defaults.fps.clone(),
            quality: defaults.quality.clone(),
            speed_preset: defaults.speed_preset.clone(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::VideoCodec => &self.video_codec,
            Field::AudioCodec => &self.audio_codec,
            Field::VideoBitrate => &self.video_bitrate,
            Field::AudioBitrate => &self.audio_bitrate,
            Field::Resolution => &self.resolution,
            Field::Fps => &self.fps,
            Field::Quality => &self.quality,
            Field::SpeedPreset => &self.speed_preset,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::VideoCodec => &mut self.video_codec,
            Field::AudioCodec => &mut self.audio_codec,
            Field::VideoBitrate => &mut self.video_bitrate,
            Field::AudioBitrate => &mut self.audio_bitrate,
            Field::Resolution => &mut self.resolution,
            Field::Fps => &mut self.fps,
            Field::Quality => &mut self.quality,
            Field::SpeedPreset => &mut self.speed_preset,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot(field) = value.into().trim().to_string();
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Resolve a request from the selections.
///
/// Quick mode carries only paths and format. Advanced mode carries every field,
/// except `resolution`/`fps` when they are left empty.
pub fn resolve(
    mode: Mode,
    format: &str,
    fields: &AdvancedFields,
    input_path: &str,
    output_path: &str,
) -> ConversionRequest {
    let mut request = ConversionRequest {
        input_path: input_path.to_string(),
        output_path: output_path.to_string(),
        format: format.to_string(),
        ..Default::default()
    };

    if mode == Mode::Advanced {
        request.video_codec = Some(fields.video_codec.clone());
        request.audio_codec = Some(fields.audio_codec.clone());
        request.video_bitrate = Some(fields.video_bitrate.clone());
        request.audio_bitrate = Some(fields.audio_bitrate.clone());
        request.resolution = non_empty(&fields.resolution);
        request.fps = non_empty(&fields.fps);
        request.quality = Some(fields.quality.clone());
        request.preset = Some(fields.speed_preset.clone());
    }

    request
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSettings {
    mode: Mode,
    input_path: Option<PathBuf>,
    selected_format: String,
    selected_preset: Option<String>,
    fields: AdvancedFields,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            mode: Mode::Quick,
            input_path: None,
            selected_format: "mp4".to_string(),
            selected_preset: None,
            fields: AdvancedFields::default(),
        }
    }
}

impl ConversionSettings {
    pub fn from_defaults(defaults: &DefaultsConfig) -> Self {
        Self {
            mode: defaults.mode,
            input_path: None,
            selected_format: defaults.format.clone(),
            selected_preset: None,
            fields: AdvancedFields::from_defaults(defaults),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input_path(&self) -> Option<&Path> {
        self.input_path.as_deref()
    }

    pub fn selected_format(&self) -> &str {
        &self.selected_format
    }

    pub fn selected_preset(&self) -> Option<&str> {
        self.selected_preset.as_deref()
    }

    pub fn fields(&self) -> &AdvancedFields {
        &self.fields
    }

    pub fn field(&self, field: Field) -> &str {
        self.fields.get(field)
    }

    pub fn set_input(&mut self, path: Option<PathBuf>) {
        self.input_path = path;
    }

    /// Select the target format by canonical extension. Other fields are untouched.
    pub fn select_format(&mut self, extension: &str) {
        self.selected_format = extension.to_string();
    }

    /// Apply a preset: its format plus every field it defines.
    ///
    /// Fields the preset leaves unset keep their current value. Re-applying the
    /// same preset restores its values even after later edits.
    pub fn apply_preset(&mut self, preset: &PresetDescriptor) {
        let settings = &preset.settings;
        self.selected_preset = Some(preset.name.clone());
        self.selected_format = settings.format.clone();

        let defined = [
            (Field::VideoCodec, &settings.video_codec),
            (Field::AudioCodec, &settings.audio_codec),
            (Field::VideoBitrate, &settings.video_bitrate),
            (Field::AudioBitrate, &settings.audio_bitrate),
            (Field::Resolution, &settings.resolution),
            (Field::Fps, &settings.fps),
            (Field::Quality, &settings.quality),
            (Field::SpeedPreset, &settings.preset),
        ];
        for (field, value) in defined {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                self.fields.set(field, value);
            }
        }
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.fields.set(field, value);
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Resolve the request for a chosen destination
    pub fn resolve(&self, output_path: &Path) -> ConversionRequest {
        let input = self
            .input_path
            .as_deref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();

        resolve(
            self.mode,
            &self.selected_format,
            &self.fields,
            &input,
            &output_path.to_string_lossy(),
        )
    }
}
