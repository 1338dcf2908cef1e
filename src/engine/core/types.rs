use serde::{Deserialize, Serialize};
use std::fmt;

/// Speed/quality trade-off names accepted by x264/x265, fastest first
pub const SPEED_PRESETS: &[&str] = &[
    "ultrafast",
    "superfast",
    "veryfast",
    "faster",
    "fast",
    "medium",
    "slow",
    "slower",
    "veryslow",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Video,
    Audio,
}

impl MediaCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A container format the backend can write
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormatDescriptor {
    pub name: String,
    /// First entry is the canonical extension
    pub extensions: Vec<String>,
    pub description: String,
    pub category: MediaCategory,
}

impl FormatDescriptor {
    pub fn new(name: &str, extensions: &[&str], description: &str, category: MediaCategory) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            description: description.to_string(),
            category,
        }
    }

    pub fn canonical_extension(&self) -> Option<&str> {
        self.extensions.first().map(String::as_str)
    }
}

/// Partial bundle of field values carried by a preset.
///
/// Shaped like a `ConversionRequest` minus the paths; `None` means "leave the
/// current field value alone" when the preset is applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PresetSettings {
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_bitrate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_bitrate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PresetDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub settings: PresetSettings,
}

/// Fully resolved job description sent to the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input_path: String,
    pub output_path: String,
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_bitrate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_bitrate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
}

impl ConversionRequest {
    /// True when any encoder parameter is set (advanced-mode request)
    pub fn has_encoder_fields(&self) -> bool {
        self.video_codec.is_some()
            || self.audio_codec.is_some()
            || self.video_bitrate.is_some()
            || self.audio_bitrate.is_some()
            || self.resolution.is_some()
            || self.fps.is_some()
            || self.quality.is_some()
            || self.preset.is_some()
    }
}

/// Latest snapshot of an in-flight conversion
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProgressSample {
    pub percentage: f32,
    pub time: String,
    pub speed: String,
    pub bitrate: String,
}

/// Parser for ffmpeg `-progress` output (key=value blocks ending in `progress=...`)
#[derive(Debug, Default, Clone)]
pub struct ProgressParser {
    pub out_time_us: u64,
    pub speed: Option<f64>,
    pub bitrate_kbps: Option<f64>,
    pub total_size: Option<u64>,
    pub is_complete: bool,
}

impl ProgressParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single line of ffmpeg progress output.
    /// Returns true when the line closes a progress block.
    pub fn parse_line(&mut self, line: &str) -> bool {
        let Some((key, value)) = line.split_once('=') else {
            return false;
        };
        let value = value.trim();

        match key.trim() {
            // ffmpeg reports out_time_ms in microseconds as well
            "out_time_us" | "out_time_ms" => {
                if let Ok(us) = value.parse::<u64>() {
                    self.out_time_us = us;
                }
            }
            "speed" => {
                if let Ok(s) = value.trim_end_matches('x').trim().parse::<f64>() {
                    self.speed = Some(s);
                }
            }
            "bitrate" => {
                if let Ok(b) = value.trim_end_matches("kbits/s").trim().parse::<f64>() {
                    self.bitrate_kbps = Some(b);
                }
            }
            "total_size" => {
                if let Ok(size) = value.parse::<u64>() {
                    self.total_size = Some(size);
                }
            }
            "progress" => {
                if value == "end" {
                    self.is_complete = true;
                }
                return true;
            }
            _ => {}
        }
        false
    }

    pub fn out_time_s(&self) -> f64 {
        self.out_time_us as f64 / 1_000_000.0
    }

    /// Progress percentage given total duration, 0 when the duration is unknown
    pub fn progress_pct(&self, duration_s: Option<f64>) -> f64 {
        if let Some(dur) = duration_s {
            if dur > 0.0 {
                return (self.out_time_s() / dur * 100.0).clamp(0.0, 100.0);
            }
        }
        0.0
    }

    pub fn sample(&self, duration_s: Option<f64>) -> ProgressSample {
        let percentage = if self.is_complete && duration_s.is_some() {
            100.0
        } else {
            self.progress_pct(duration_s)
        };

        ProgressSample {
            percentage: percentage as f32,
            time: format!("{:.1}s", self.out_time_s()),
            speed: self
                .speed
                .map(|s| format!("{:.2}x", s))
                .unwrap_or_else(|| "N/A".to_string()),
            bitrate: self
                .bitrate_kbps
                .map(|b| format!("{:.1}kbits/s", b))
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}
