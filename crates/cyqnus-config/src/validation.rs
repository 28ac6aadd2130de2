//! Parameter and patch validation.
//!
//! Values are checked against the synth's [`PARAM_LAYOUT`]: unknown string
//! ids, non-finite values and values outside the descriptor range are
//! reported rather than clamped.
//!
//! # Example
//!
//! ```rust
//! use cyqnus_config::{ValidationError, validate_param};
//!
//! assert!(validate_param("amp_attack", 0.5).is_ok());
//! assert!(matches!(
//!     validate_param("amp_sustain", 1.5),
//!     Err(ValidationError::OutOfRange { .. })
//! ));
//! ```

use cyqnus_core::ParamDescriptor;
use cyqnus_synth::{OscillatorWaveform, PARAM_LAYOUT};
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Key that does not name a parameter in its section.
    #[error("unknown parameter '{param}' in {section}")]
    UnknownParameter {
        /// Section holding the key, e.g. `envelope` or `oscillator 2`.
        section: String,
        /// The unrecognized key.
        param: String,
    },

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// String id of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// NaN or infinite value.
    #[error("parameter '{param}' is not a finite number")]
    NotFinite {
        /// String id of the parameter.
        param: String,
    },

    /// Waveform name not in [`OscillatorWaveform::NAMES`].
    #[error("unknown waveform '{name}' for oscillator {oscillator}")]
    UnknownWaveform {
        /// One-based oscillator number.
        oscillator: usize,
        /// The unrecognized name.
        name: String,
    },

    /// More oscillator tables than the engine has oscillators.
    #[error("patch has {count} oscillators, at most {max} are supported")]
    TooManyOscillators {
        /// Number of oscillator tables.
        count: usize,
        /// Supported maximum.
        max: usize,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Descriptor for a parameter string id, e.g. `osc2_coarse`.
pub fn find_param(string_id: &str) -> Option<&'static ParamDescriptor> {
    PARAM_LAYOUT.iter().find(|d| d.string_id == string_id)
}

/// Check one value against its descriptor.
pub fn validate_param(string_id: &str, value: f32) -> ValidationResult<()> {
    let Some(desc) = find_param(string_id) else {
        return Err(ValidationError::UnknownParameter {
            section: "layout".to_string(),
            param: string_id.to_string(),
        });
    };
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            param: string_id.to_string(),
        });
    }
    if !desc.in_range(value) {
        return Err(ValidationError::OutOfRange {
            param: string_id.to_string(),
            value,
            min: desc.min,
            max: desc.max,
        });
    }
    Ok(())
}

/// Resolve a waveform name for the one-based `oscillator`.
pub fn validate_waveform(oscillator: usize, name: &str) -> ValidationResult<OscillatorWaveform> {
    OscillatorWaveform::from_name(name).ok_or_else(|| ValidationError::UnknownWaveform {
        oscillator,
        name: name.to_string(),
    })
}

/// Fold collected errors into a single result.
pub(crate) fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_known_param() {
        assert!(validate_param("amp_release", 2.0).is_ok());
        assert!(validate_param("osc3_detune", 10.0).is_ok());
    }

    #[test]
    fn test_validate_unknown_param() {
        assert!(matches!(
            validate_param("amp_cutoff", 0.5),
            Err(ValidationError::UnknownParameter { ref param, .. }) if param == "amp_cutoff"
        ));
    }

    #[test]
    fn test_validate_out_of_range() {
        let err = validate_param("osc1_coarse", 30.0).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                param: "osc1_coarse".to_string(),
                value: 30.0,
                min: -24.0,
                max: 24.0,
            }
        );
    }

    #[test]
    fn test_validate_not_finite() {
        assert!(matches!(
            validate_param("amp_sustain", f32::NAN),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_validate_waveform() {
        assert_eq!(validate_waveform(1, "saw"), Ok(OscillatorWaveform::Saw));
        assert!(validate_waveform(1, "wobble").is_err());
    }

    #[test]
    fn test_collect() {
        assert!(collect(Vec::new()).is_ok());

        let one = ValidationError::NotFinite {
            param: "a".to_string(),
        };
        assert_eq!(collect(vec![one.clone()]), Err(one.clone()));

        let err = collect(vec![one.clone(), one]).unwrap_err();
        assert!(matches!(err, ValidationError::Multiple(ref v) if v.len() == 2));
        assert!(err.to_string().contains("; "));
    }
}
