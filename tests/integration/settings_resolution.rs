// Settings resolution and the destination step, driven through the public API

use mediaconv::control::{
    CatalogStore, ConversionSettings, DestinationRequest, Field, Mode, ValidationError, prepare,
};
use mediaconv::engine::FfmpegBackend;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::common::assertions::*;
use crate::common::helpers::*;

fn catalog() -> CatalogStore {
    CatalogStore::fetch(&ScriptedBackend::new())
}

#[test]
fn test_quick_mode_request_carries_no_encoder_fields() {
    let dir = TempDir::new().unwrap();
    let input = media_fixture(dir.path(), "a.mov");

    let mut settings = ConversionSettings::default();
    settings.set_input(Some(input.clone()));
    settings.select_format("mp4");

    let mut offered = None;
    let mut picker = |req: &DestinationRequest| {
        offered = Some(req.clone());
        Some(dir.path().join("a.mp4"))
    };
    let request = prepare(&settings, &catalog(), None, &mut picker)
        .unwrap()
        .unwrap();

    let offered = offered.unwrap();
    assert_eq!(offered.suggested, dir.path().join("a.mp4"));
    assert_eq!(offered.extension, "mp4");

    assert_eq!(request.input_path, input.to_string_lossy());
    assert_eq!(request.format, "mp4");
    assert!(!request.has_encoder_fields());
}

#[test]
fn test_advanced_mode_with_preset() {
    let dir = TempDir::new().unwrap();
    let input = media_fixture(dir.path(), "a.mov");
    let catalog = catalog();

    let mut settings = ConversionSettings::default();
    settings.set_input(Some(input));
    settings.apply_preset(catalog.preset("Web Optimized").unwrap());
    settings.set_mode(Mode::Advanced);

    let mut picker = |_: &DestinationRequest| Some(dir.path().join("b.mp4"));
    let request = prepare(&settings, &catalog, None, &mut picker)
        .unwrap()
        .unwrap();

    assert_eq!(request.video_codec.as_deref(), Some("libx264"));
    assert_eq!(request.audio_codec.as_deref(), Some("aac"));
    assert_eq!(request.video_bitrate.as_deref(), Some("1500k"));
    assert_eq!(request.audio_bitrate.as_deref(), Some("128k"));
    assert_eq!(request.resolution.as_deref(), Some("1280x720"));
    assert_eq!(request.fps.as_deref(), Some("30"));
    assert_eq!(request.quality.as_deref(), Some("23"));
    assert_eq!(request.preset.as_deref(), Some("fast"));
}

#[test]
fn test_partial_preset_keeps_other_fields() {
    let catalog = catalog();
    let mut settings = ConversionSettings::default();
    settings.set_field(Field::Resolution, "1920x1080");
    settings.set_field(Field::Quality, "19");

    settings.apply_preset(catalog.preset("Extract Audio").unwrap());

    assert_eq!(settings.selected_format(), "mp3");
    assert_eq!(settings.field(Field::AudioCodec), "libmp3lame");
    assert_eq!(settings.field(Field::AudioBitrate), "320k");
    assert_eq!(settings.field(Field::Resolution), "1920x1080");
    assert_eq!(settings.field(Field::Quality), "19");
}

#[test]
fn test_cancelled_destination_yields_nothing() {
    let dir = TempDir::new().unwrap();
    let mut settings = ConversionSettings::default();
    settings.set_input(Some(media_fixture(dir.path(), "a.mov")));

    let mut picker = |_: &DestinationRequest| -> Option<PathBuf> { None };
    assert_eq!(prepare(&settings, &catalog(), None, &mut picker), Ok(None));
}

#[test]
fn test_no_input_never_reaches_the_picker() {
    let settings = ConversionSettings::default();
    let mut asked = false;
    let mut picker = |_: &DestinationRequest| {
        asked = true;
        Some(PathBuf::from("/tmp/out.mp4"))
    };

    assert_eq!(
        prepare(&settings, &catalog(), None, &mut picker),
        Err(ValidationError::NoInput)
    );
    assert!(!asked);
}

#[test]
fn test_destination_gets_target_extension() {
    let dir = TempDir::new().unwrap();
    let mut settings = ConversionSettings::default();
    settings.set_input(Some(media_fixture(dir.path(), "a.mov")));
    settings.select_format("mkv");

    let mut picker = |_: &DestinationRequest| Some(dir.path().join("renamed"));
    let request = prepare(&settings, &catalog(), None, &mut picker)
        .unwrap()
        .unwrap();

    assert_eq!(
        PathBuf::from(&request.output_path),
        dir.path().join("renamed.mkv")
    );
}

#[test]
fn test_filename_pattern_shapes_the_suggestion() {
    let dir = TempDir::new().unwrap();
    let mut settings = ConversionSettings::default();
    settings.set_input(Some(media_fixture(dir.path(), "clip.mov")));
    settings.select_format("webm");

    let mut suggested = None;
    let mut picker = |req: &DestinationRequest| -> Option<PathBuf> {
        suggested = Some(req.suggested.clone());
        None
    };
    prepare(
        &settings,
        &catalog(),
        Some("{basename}_encoded.{ext}"),
        &mut picker,
    )
    .unwrap();

    assert_eq!(suggested, Some(dir.path().join("clip_encoded.webm")));
}

#[test]
fn test_invalid_advanced_field_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut settings = ConversionSettings::default();
    settings.set_input(Some(media_fixture(dir.path(), "a.mov")));
    settings.set_mode(Mode::Advanced);
    settings.set_field(Field::Resolution, "wide");

    let mut picker = |_: &DestinationRequest| Some(dir.path().join("a.mp4"));
    let err = prepare(&settings, &catalog(), None, &mut picker).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidField { .. }));

    // The same value is never sent in quick mode
    settings.set_mode(Mode::Quick);
    let mut picker = |_: &DestinationRequest| Some(dir.path().join("a.mp4"));
    assert!(prepare(&settings, &catalog(), None, &mut picker).is_ok());
}

#[test]
fn test_command_line_reflects_resolved_fields() {
    let dir = TempDir::new().unwrap();
    let catalog = catalog();
    let mut settings = ConversionSettings::default();
    settings.set_input(Some(media_fixture(dir.path(), "a.mov")));
    settings.apply_preset(catalog.preset("Mobile Friendly").unwrap());

    let mut picker = |_: &DestinationRequest| Some(dir.path().join("phone.mp4"));
    let quick = prepare(&settings, &catalog, None, &mut picker)
        .unwrap()
        .unwrap();
    let backend = FfmpegBackend::new("ffmpeg", "ffprobe");
    let cmd = backend.command_line(&quick).unwrap();
    assert_cmd_not_contains(&cmd, "-c:v");
    assert_cmd_not_contains(&cmd, "-vn");

    settings.set_mode(Mode::Advanced);
    let mut picker = |_: &DestinationRequest| Some(dir.path().join("phone.mp4"));
    let advanced = prepare(&settings, &catalog, None, &mut picker)
        .unwrap()
        .unwrap();
    let cmd = backend.command_line(&advanced).unwrap();
    assert_cmd_contains(&cmd, "-progress");
    assert_cmd_has_flag_value(&cmd, "-s", "854x480");
    assert_cmd_has_flag_value(&cmd, "-r", "24");
    assert_cmd_has_flag_value(&cmd, "-preset", "veryfast");
    assert_eq!(get_flag_value(&cmd, "-crf"), Some("28"));
}
