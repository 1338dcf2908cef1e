// Global configuration management

use crate::control::Mode;
use crate::engine::PresetDescriptor;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// User presets, appended to the built-in ones
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub presets: Vec<PresetDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,
}

/// Initial values for the conversion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_format")]
    pub format: String,

    #[serde(default)]
    pub mode: Mode,

    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    #[serde(default = "default_video_bitrate")]
    pub video_bitrate: String,

    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,

    /// Empty keeps the source resolution
    #[serde(default)]
    pub resolution: String,

    /// Empty keeps the source frame rate
    #[serde(default)]
    pub fps: String,

    #[serde(default = "default_quality")]
    pub quality: String,

    #[serde(default = "default_speed_preset")]
    pub speed_preset: String,

    /// Suggested output filename.
    /// Supports: {filename}, {basename}, {ext}
    #[serde(default = "default_filename_pattern")]
    pub filename_pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file for the TUI (defaults to the data directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_format() -> String {
    "mp4".to_string()
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_video_bitrate() -> String {
    "2000k".to_string()
}

fn default_audio_bitrate() -> String {
    "192k".to_string()
}

fn default_quality() -> String {
    "23".to_string()
}

fn default_speed_preset() -> String {
    "medium".to_string()
}

fn default_filename_pattern() -> String {
    "{basename}".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            mode: Mode::Quick,
            video_codec: default_video_codec(),
            audio_codec: default_audio_codec(),
            video_bitrate: default_video_bitrate(),
            audio_bitrate: default_audio_bitrate(),
            resolution: String::new(),
            fps: String::new(),
            quality: default_quality(),
            speed_preset: default_speed_preset(),
            filename_pattern: default_filename_pattern(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl DefaultsConfig {
    /// Pattern to pass to output-path derivation; blank means "input stem"
    pub fn filename_pattern(&self) -> Option<&str> {
        Some(self.filename_pattern.as_str()).filter(|p| !p.trim().is_empty())
    }
}

impl LoggingConfig {
    /// Configured log file, or `<data_local_dir>/mediaconv/mediaconv.log`
    pub fn file_path(&self) -> Result<PathBuf> {
        match &self.file {
            Some(path) => Ok(path.clone()),
            None => Ok(dirs::data_local_dir()
                .context("Could not determine data directory")?
                .join("mediaconv")
                .join("mediaconv.log")),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "macos") {
            dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".config")
                .join("mediaconv")
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("mediaconv")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from disk, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();

            // Not fatal: the directory may be read-only
            if let Err(e) = config.save() {
                eprintln!("Warning: Could not create default config file: {:#}", e);
                eprintln!(
                    "Using built-in defaults. Run 'mediaconv init-config' to create a config file."
                );
            }

            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Check if config file exists
    pub fn exists() -> bool {
        Self::config_path().map(|p| p.exists()).unwrap_or(false)
    }

    /// Create a default config file if it doesn't exist
    pub fn ensure_default() -> Result<()> {
        if !Self::exists() {
            Config::default().save()?;
        }
        Ok(())
    }
}
