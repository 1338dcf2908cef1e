use clap::{Args, Parser, Subcommand, ValueEnum};
use mediaconv::engine::MediaCategory;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mediaconv")]
#[command(about = "Media converter with presets and a live progress TUI", long_about = None)]
pub struct Cli {
    /// Input file to preselect in the TUI
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the supported target formats
    Formats {
        /// Only show one category
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the built-in and configured presets
    Presets {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Convert one file without the TUI
    Convert(ConvertArgs),

    /// Check if ffmpeg and ffprobe are installed
    CheckFfmpeg,

    /// Show config status and location, or create default config if missing
    InitConfig,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Video,
    Audio,
}

impl From<CategoryArg> for MediaCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Video => MediaCategory::Video,
            CategoryArg::Audio => MediaCategory::Audio,
        }
    }
}

#[derive(Args)]
pub struct ConvertArgs {
    /// File to convert
    pub input: PathBuf,

    /// Destination (the target extension is appended when missing)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Target format extension (defaults to the output's extension, then the configured format)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Apply a preset by name before other options
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Send every encoder parameter explicitly
    #[arg(long)]
    pub advanced: bool,

    /// Encoder options below switch to advanced mode
    #[arg(long)]
    pub video_codec: Option<String>,

    #[arg(long)]
    pub audio_codec: Option<String>,

    #[arg(long)]
    pub video_bitrate: Option<String>,

    #[arg(long)]
    pub audio_bitrate: Option<String>,

    /// WIDTHxHEIGHT
    #[arg(long)]
    pub resolution: Option<String>,

    #[arg(long)]
    pub fps: Option<String>,

    /// CRF value, 0-51
    #[arg(long)]
    pub quality: Option<String>,

    #[arg(long)]
    pub speed_preset: Option<String>,

    /// Print the ffmpeg command instead of running it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
