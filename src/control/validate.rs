// Pre-submission checks on a resolved request

use super::catalog::CatalogStore;
use crate::engine::{ConversionRequest, SPEED_PRESETS};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select an input file first.")]
    NoInput,

    #[error("Input file not found: {0}")]
    InputMissing(String),

    #[error("Please choose where to save the converted file.")]
    NoOutput,

    #[error("The output file must be different from the input file.")]
    SameAsInput,

    #[error("Unsupported target format: {0}")]
    UnknownFormat(String),

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("Invalid {field} '{value}': {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

fn invalid(field: &'static str, value: &str, reason: &'static str) -> ValidationError {
    ValidationError::InvalidField {
        field,
        value: value.to_string(),
        reason,
    }
}

/// A number with an optional k/K/m/M suffix, e.g. `2000k` or `1.5M`
pub fn is_rate_expression(value: &str) -> bool {
    let number = value.strip_suffix(['k', 'K', 'm', 'M']).unwrap_or(value);
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let well_formed = match number.split_once('.') {
        Some((whole, frac)) => is_digits(whole) && is_digits(frac),
        None => is_digits(number),
    };
    well_formed && number.bytes().any(|b| b.is_ascii_digit() && b != b'0')
}

fn positive_int(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse::<u32>().ok().filter(|v| *v > 0)
}

/// `WIDTHxHEIGHT` with positive integers
pub fn parse_resolution(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.split_once(['x', 'X'])?;
    Some((positive_int(w)?, positive_int(h)?))
}

/// Check a resolved request before it reaches the backend.
///
/// Format membership is only checked when the catalog has formats; with an
/// empty catalog the backend is left to reject unknown formats.
pub fn validate_request(
    request: &ConversionRequest,
    catalog: &CatalogStore,
) -> Result<(), ValidationError> {
    if request.input_path.trim().is_empty() {
        return Err(ValidationError::NoInput);
    }
    if !Path::new(&request.input_path).is_file() {
        return Err(ValidationError::InputMissing(request.input_path.clone()));
    }
    if request.output_path.trim().is_empty() {
        return Err(ValidationError::NoOutput);
    }
    if Path::new(&request.input_path) == Path::new(&request.output_path) {
        return Err(ValidationError::SameAsInput);
    }
    if !catalog.formats().is_empty() && !catalog.is_known_format(&request.format) {
        return Err(ValidationError::UnknownFormat(request.format.clone()));
    }

    validate_encoder_fields(request)
}

/// Well-formedness of the advanced fields that are present
pub fn validate_encoder_fields(request: &ConversionRequest) -> Result<(), ValidationError> {
    for (field, value) in [
        ("Video codec", &request.video_codec),
        ("Audio codec", &request.audio_codec),
    ] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(ValidationError::EmptyField { field });
        }
    }

    for (field, value) in [
        ("video bitrate", &request.video_bitrate),
        ("audio bitrate", &request.audio_bitrate),
    ] {
        if let Some(v) = value.as_deref() {
            if !is_rate_expression(v) {
                return Err(invalid(field, v, "expected a rate such as 2000k"));
            }
        }
    }

    if let Some(v) = request.resolution.as_deref() {
        if parse_resolution(v).is_none() {
            return Err(invalid("resolution", v, "expected WIDTHxHEIGHT"));
        }
    }

    if let Some(v) = request.fps.as_deref() {
        if positive_int(v).is_none() {
            return Err(invalid("fps", v, "expected a positive whole number"));
        }
    }

    if let Some(v) = request.quality.as_deref() {
        let in_range = v.bytes().all(|b| b.is_ascii_digit())
            && v.parse::<u8>().is_ok_and(|q| q <= 51);
        if !in_range {
            return Err(invalid("quality", v, "expected a number from 0 to 51"));
        }
    }

    if let Some(v) = request.preset.as_deref() {
        if !SPEED_PRESETS.contains(&v) {
            return Err(invalid("encoder preset", v, "unknown speed preset"));
        }
    }

    Ok(())
}
