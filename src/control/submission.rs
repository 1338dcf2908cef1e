//! Destination step between the start action and `JobController::submit`.
//!
//! The start action is split in two so the TUI can show its own destination
//! prompt in between: [`begin`] checks that an input is set and proposes a
//! destination, [`complete`] takes the user's answer and produces a validated
//! request. [`prepare`] chains both for callers with a synchronous picker.

use super::catalog::CatalogStore;
use super::settings::ConversionSettings;
use super::validate::{ValidationError, validate_request};
use crate::engine::{ConversionRequest, derive_output_path, with_target_extension};
use std::path::PathBuf;

/// What the destination prompt should offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationRequest {
    pub suggested: PathBuf,
    /// Only files with this extension may be chosen
    pub extension: String,
}

/// Anything that can ask the user for a destination. `None` means cancelled.
pub trait DestinationPicker {
    fn pick(&mut self, request: &DestinationRequest) -> Option<PathBuf>;
}

impl<F> DestinationPicker for F
where
    F: FnMut(&DestinationRequest) -> Option<PathBuf>,
{
    fn pick(&mut self, request: &DestinationRequest) -> Option<PathBuf> {
        self(request)
    }
}

pub fn begin(
    settings: &ConversionSettings,
    filename_pattern: Option<&str>,
) -> Result<DestinationRequest, ValidationError> {
    let input = settings.input_path().ok_or(ValidationError::NoInput)?;
    let extension = settings.selected_format().to_string();

    Ok(DestinationRequest {
        suggested: derive_output_path(input, &extension, filename_pattern),
        extension,
    })
}

/// Finish the start action with the user's destination choice.
///
/// `Ok(None)` means the user cancelled; nothing changes.
pub fn complete(
    settings: &ConversionSettings,
    catalog: &CatalogStore,
    chosen: Option<PathBuf>,
) -> Result<Option<ConversionRequest>, ValidationError> {
    let Some(chosen) = chosen else {
        tracing::debug!("destination selection cancelled");
        return Ok(None);
    };
    if chosen.as_os_str().is_empty() {
        return Err(ValidationError::NoOutput);
    }

    let output = with_target_extension(chosen, settings.selected_format());
    let request = settings.resolve(&output);
    validate_request(&request, catalog)?;
    Ok(Some(request))
}

pub fn prepare(
    settings: &ConversionSettings,
    catalog: &CatalogStore,
    filename_pattern: Option<&str>,
    picker: &mut dyn DestinationPicker,
) -> Result<Option<ConversionRequest>, ValidationError> {
    let destination = begin(settings, filename_pattern)?;
    complete(settings, catalog, picker.pick(&destination))
}
