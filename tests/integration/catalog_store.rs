// Catalog loading against scripted and ffmpeg backends

use mediaconv::config::Config;
use mediaconv::control::CatalogStore;
use mediaconv::engine::{
    Backend, FfmpegBackend, MediaCategory, PresetDescriptor, PresetSettings, builtin_presets,
};

use crate::common::helpers::*;

#[test]
fn test_fetch_loads_both_lists() {
    let catalog = CatalogStore::fetch(&ScriptedBackend::new());

    assert!(catalog.is_loaded());
    assert_eq!(catalog.formats().len(), 16);
    assert_eq!(catalog.formats_by_category(MediaCategory::Video).count(), 8);
    assert_eq!(catalog.formats_by_category(MediaCategory::Audio).count(), 8);
    assert_eq!(catalog.presets().len(), 6);
    assert!(catalog.is_known_format("webm"));
    assert!(!catalog.is_known_format("gif"));
}

#[test]
fn test_format_failure_leaves_presets_intact() {
    let backend = ScriptedBackend::new().failing_formats("ffmpeg not found");
    let catalog = CatalogStore::fetch(&backend);

    assert!(catalog.is_loaded());
    assert!(catalog.formats().is_empty());
    assert_eq!(catalog.presets().len(), 6);
}

#[test]
fn test_preset_failure_leaves_formats_intact() {
    let backend = ScriptedBackend::new().failing_presets("broken");
    let catalog = CatalogStore::fetch(&backend);

    assert_eq!(catalog.formats().len(), 16);
    assert!(catalog.presets().is_empty());
}

#[test]
fn test_catalog_is_loaded_once() {
    let mut catalog = CatalogStore::new();
    catalog.load_presets(Ok(builtin_presets()));
    catalog.load_presets(Ok(Vec::new()));
    assert_eq!(catalog.presets().len(), 6);
}

#[test]
fn test_ffmpeg_backend_merges_user_presets() {
    let mut config = Config::default();
    let user = |name: &str, format: &str| PresetDescriptor {
        name: name.to_string(),
        description: "mine".to_string(),
        settings: PresetSettings {
            format: format.to_string(),
            audio_codec: Some("libopus".to_string()),
            ..Default::default()
        },
    };
    config.presets = vec![user("Podcast", "opus"), user("Web Optimized", "webm")];

    let backend = FfmpegBackend::from_config(&config);
    let presets = backend.get_presets().unwrap();

    assert_eq!(presets.len(), 7);
    assert_eq!(presets.last().unwrap().name, "Podcast");
    // Built-in preset wins over a user preset with the same name
    let web = presets.iter().find(|p| p.name == "Web Optimized").unwrap();
    assert_eq!(web.settings.format, "mp4");

    let catalog = CatalogStore::fetch(&backend);
    assert_eq!(
        catalog.preset("Podcast").unwrap().settings.audio_codec.as_deref(),
        Some("libopus")
    );
}
