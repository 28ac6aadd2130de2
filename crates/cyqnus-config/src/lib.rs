//! Patch files and validation for the cyqnus synthesizer.
//!
//! A [`Patch`] is a TOML description of a sound: master gain, an
//! `[envelope]` table and up to three `[[oscillators]]`. Patches are
//! validated against the synth parameter layout and applied onto a
//! [`ParamStore`](cyqnus_core::ParamStore).
//!
//! # Example
//!
//! ```rust
//! use cyqnus_config::{OscillatorConfig, Patch};
//! use cyqnus_core::ParamStore;
//! use cyqnus_synth::PARAM_LAYOUT;
//!
//! let patch = Patch::new("Bass")
//!     .with_envelope(0.005, 0.0, 0.3, 0.7, 0.1)
//!     .with_oscillator(OscillatorConfig::new("Saw", 0.9).with_coarse(-12));
//! patch.validate().unwrap();
//!
//! let store = ParamStore::new(&PARAM_LAYOUT);
//! patch.apply(&store).unwrap();
//!
//! let captured = Patch::from_store("Bass", &store);
//! assert_eq!(captured.oscillators[0].coarse, Some(-12));
//! ```

mod error;
mod patch;

/// Parameter and patch validation.
pub mod validation;

/// Factory patches bundled with the library.
pub mod factory_patches;

pub use error::ConfigError;
pub use factory_patches::{factory_patch_names, factory_patches, get_factory_patch};
pub use patch::{EnvelopeConfig, OscillatorConfig, Patch, UnknownKeys};
pub use validation::{
    ValidationError, ValidationResult, find_param, validate_param, validate_waveform,
};
