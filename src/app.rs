use crate::cli::{CategoryArg, Cli, Commands, ConvertArgs};
use anyhow::{Context, Result, bail};
use mediaconv::config::Config;
use mediaconv::control::{
    CatalogStore, ConversionSettings, DestinationRequest, Field, JobController, JobOutcome,
    Mode, ProgressSubscriber, prepare,
};
use mediaconv::engine::{
    self, BackendEvent, FfmpegBackend, MediaCategory, ProgressSample, Worker,
};
use mediaconv::logging::{self, LogTarget};
use mediaconv::ui;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Duration;

fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {:#}", e);
            eprintln!("Using built-in defaults.");
            Config::default()
        }
    }
}

pub fn run(cli: Cli) {
    let config = load_config();

    if let Some(command) = cli.command {
        if let Err(e) = logging::init_logging(&config.logging, LogTarget::Stderr) {
            eprintln!("Warning: logging disabled: {:#}", e);
        }

        match command {
            Commands::Formats { category, json } => handle_formats(&config, category, json),
            Commands::Presets { json } => handle_presets(&config, json),
            Commands::Convert(args) => handle_convert(&config, args),
            Commands::CheckFfmpeg => handle_check_ffmpeg(&config),
            Commands::InitConfig => handle_init_config(),
        }
        return;
    }

    if let Err(e) = logging::init_logging(&config.logging, LogTarget::File) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    // Launch TUI (default behavior)
    if let Err(e) = ui::run_ui(cli.input, &config) {
        eprintln!("Error running UI: {}", e);
        process::exit(1);
    }
}

fn catalog_for(config: &Config) -> (Arc<FfmpegBackend>, CatalogStore) {
    let backend = Arc::new(FfmpegBackend::from_config(config));
    let catalog = CatalogStore::fetch(backend.as_ref());
    (backend, catalog)
}

fn handle_formats(config: &Config, category: Option<CategoryArg>, json: bool) {
    let (_, catalog) = catalog_for(config);
    let filter: Option<MediaCategory> = category.map(Into::into);
    let formats: Vec<_> = catalog
        .formats()
        .iter()
        .filter(|f| filter.is_none_or(|c| f.category == c))
        .collect();

    if json {
        print_json(&formats);
        return;
    }

    for category in [MediaCategory::Video, MediaCategory::Audio] {
        let group: Vec<_> = formats.iter().filter(|f| f.category == category).collect();
        if group.is_empty() {
            continue;
        }
        println!("{}:", category);
        for format in group {
            println!(
                "  {:<6} {:<8} {}",
                format.canonical_extension().unwrap_or("-"),
                format.name,
                format.description
            );
        }
    }
}

fn handle_presets(config: &Config, json: bool) {
    let (_, catalog) = catalog_for(config);

    if json {
        print_json(&catalog.presets());
        return;
    }

    for preset in catalog.presets() {
        println!("{} [{}]", preset.name, preset.settings.format);
        if !preset.description.is_empty() {
            println!("    {}", preset.description);
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn handle_check_ffmpeg(config: &Config) {
    match engine::ffmpeg_version(&config.backend.ffmpeg_path) {
        Ok(version) => {
            println!("ffmpeg found: {}", version);
            match engine::ffprobe_version(&config.backend.ffprobe_path) {
                Ok(probe_version) => {
                    println!("ffprobe found: {}", probe_version);
                    process::exit(0);
                }
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn handle_convert(config: &Config, args: ConvertArgs) {
    match run_convert(config, args) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Target format: explicit flag, else the output's extension if known, else the default
fn target_format(args: &ConvertArgs, catalog: &CatalogStore, fallback: &str) -> String {
    if let Some(format) = &args.format {
        return format.to_ascii_lowercase();
    }
    args.output
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| catalog.is_known_format(ext))
        .unwrap_or_else(|| fallback.to_string())
}

fn settings_for(
    config: &Config,
    catalog: &CatalogStore,
    args: &ConvertArgs,
) -> Result<ConversionSettings> {
    let mut settings = ConversionSettings::from_defaults(&config.defaults);
    settings.set_input(Some(args.input.clone()));

    if let Some(name) = &args.preset {
        let preset = catalog
            .preset(name)
            .with_context(|| format!("Unknown preset: {} (see `mediaconv presets`)", name))?;
        settings.apply_preset(preset);
    }
    if args.format.is_some() || args.preset.is_none() {
        let format = target_format(args, catalog, settings.selected_format());
        settings.select_format(&format);
    }

    let overrides = [
        (Field::VideoCodec, &args.video_codec),
        (Field::AudioCodec, &args.audio_codec),
        (Field::VideoBitrate, &args.video_bitrate),
        (Field::AudioBitrate, &args.audio_bitrate),
        (Field::Resolution, &args.resolution),
        (Field::Fps, &args.fps),
        (Field::Quality, &args.quality),
        (Field::SpeedPreset, &args.speed_preset),
    ];
    let mut any_override = false;
    for (field, value) in overrides {
        if let Some(value) = value {
            settings.set_field(field, value.as_str());
            any_override = true;
        }
    }

    if args.advanced || any_override {
        settings.set_mode(Mode::Advanced);
    }
    Ok(settings)
}

fn run_convert(config: &Config, args: ConvertArgs) -> Result<bool> {
    let (backend, catalog) = catalog_for(config);
    let settings = settings_for(config, &catalog, &args)?;

    let output = args.output.clone();
    let mut picker = |_: &DestinationRequest| Some(output.clone());
    let Some(request) = prepare(
        &settings,
        &catalog,
        config.defaults.filename_pattern(),
        &mut picker,
    )?
    else {
        bail!("No destination chosen");
    };

    if args.dry_run {
        println!("{}", backend.command_line(&request)?);
        return Ok(true);
    }

    let mut worker = Worker::new(backend);
    let mut subscriber = match worker.take_progress_receiver() {
        Some(rx) => ProgressSubscriber::subscribe(rx),
        None => ProgressSubscriber::detached(),
    };
    let mut controller = JobController::new(worker.handle());

    println!(
        "Converting {} -> {} ({} mode)",
        request.input_path,
        request.output_path,
        settings.mode()
    );
    let ticket = controller.submit(request)?;

    let outcome = loop {
        let event = worker.receiver().recv_timeout(Duration::from_millis(100));

        if subscriber.drain(&mut controller) > 0 {
            if let Some(sample) = controller.progress() {
                print_progress(sample);
            }
        }

        match event {
            Ok(BackendEvent::ConvertResolved { ticket: t, result }) if t == ticket => {
                // Samples emitted just before the resolution
                subscriber.drain(&mut controller);
                if let Some(outcome) = controller.on_submit_resolved(t, result) {
                    break outcome;
                }
            }
            Ok(BackendEvent::CancelResolved(result)) => controller.on_cancel_resolved(result),
            Ok(other) => tracing::debug!(?other, "ignoring backend event"),
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                bail!("Backend bridge closed before the conversion finished")
            }
        }
    };

    println!();
    match outcome {
        JobOutcome::Completed(message) => {
            println!("{}", message);
            Ok(true)
        }
        other => {
            eprintln!("{}", other.message());
            Ok(false)
        }
    }
}

fn print_progress(sample: &ProgressSample) {
    print!(
        "\r{:>5.1}%  time {:<10} speed {:<8} bitrate {:<16}",
        sample.percentage, sample.time, sample.speed, sample.bitrate
    );
    let _ = io::stdout().flush();
}

fn handle_init_config() {
    match Config::config_path() {
        Ok(path) if path.exists() => match Config::load_from(&path) {
            Ok(cfg) => {
                println!("Config loaded successfully from {}", path.display());
                println!("{:#?}", cfg);
            }
            Err(e) => {
                eprintln!("Config invalid: {:#}", e);
                process::exit(1);
            }
        },
        Ok(path) => write_default_config(&path),
        Err(e) => {
            eprintln!("Config path unknown: {:#}", e);
            process::exit(1);
        }
    }
}

fn write_default_config(path: &Path) {
    println!("Creating default config...");
    if let Err(err) = Config::default().save_to(path) {
        eprintln!("Failed to save default config: {:#}", err);
        process::exit(1);
    }
    println!("Default config saved to {}", path.display());
}
