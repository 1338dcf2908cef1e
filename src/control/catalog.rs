// Formats and presets fetched once from the backend

use crate::engine::{Backend, FormatDescriptor, MediaCategory, PresetDescriptor};

#[derive(Debug, Default, Clone)]
pub struct CatalogStore {
    formats: Vec<FormatDescriptor>,
    presets: Vec<PresetDescriptor>,
    formats_loaded: bool,
    presets_loaded: bool,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch both lists synchronously
    pub fn fetch(backend: &dyn Backend) -> Self {
        let mut store = Self::new();
        store.load_formats(backend.get_supported_formats().map_err(|e| e.to_string()));
        store.load_presets(backend.get_presets().map_err(|e| e.to_string()));
        store
    }

    /// Apply the result of `get_supported_formats`. A failure leaves the list empty.
    pub fn load_formats(&mut self, result: Result<Vec<FormatDescriptor>, String>) {
        if self.formats_loaded {
            tracing::debug!("format list already loaded, ignoring");
            return;
        }
        self.formats_loaded = true;

        match result {
            Ok(formats) => {
                tracing::debug!(count = formats.len(), "formats loaded");
                self.formats = formats;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not load formats");
                self.formats.clear();
            }
        }
    }

    /// Apply the result of `get_presets`. A failure leaves the list empty.
    pub fn load_presets(&mut self, result: Result<Vec<PresetDescriptor>, String>) {
        if self.presets_loaded {
            tracing::debug!("preset list already loaded, ignoring");
            return;
        }
        self.presets_loaded = true;

        match result {
            Ok(presets) => {
                tracing::debug!(count = presets.len(), "presets loaded");
                self.presets = presets;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not load presets");
                self.presets.clear();
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.formats_loaded && self.presets_loaded
    }

    pub fn formats(&self) -> &[FormatDescriptor] {
        &self.formats
    }

    pub fn presets(&self) -> &[PresetDescriptor] {
        &self.presets
    }

    pub fn formats_by_category(
        &self,
        category: MediaCategory,
    ) -> impl Iterator<Item = &FormatDescriptor> {
        self.formats.iter().filter(move |f| f.category == category)
    }

    pub fn format_by_extension(&self, extension: &str) -> Option<&FormatDescriptor> {
        self.formats
            .iter()
            .find(|f| f.canonical_extension() == Some(extension))
    }

    pub fn is_known_format(&self, extension: &str) -> bool {
        self.format_by_extension(extension).is_some()
    }

    pub fn preset(&self, name: &str) -> Option<&PresetDescriptor> {
        self.presets.iter().find(|p| p.name == name)
    }
}
