//! Cyqnus Core - shared primitives for the cyqnus synthesizer
//!
//! This crate provides the pieces the synthesis engine and its collaborators
//! agree on: pitch math, parameter metadata, and the lock-free parameter
//! store that carries control-thread values to the audio thread.
//!
//! # Pitch and Level Math
//!
//! - [`midi_to_freq`] / [`freq_to_midi`] - Equal-temperament note conversion (A4 = 440 Hz)
//! - [`semitones_to_ratio`] / [`cents_to_ratio`] - Interval to frequency ratio
//! - [`sanitize_sample_rate`] - Fallback to [`DEFAULT_SAMPLE_RATE`] for invalid rates
//! - [`db_to_linear`] / [`linear_to_db`] - Level conversions for metering
//!
//! ## Parameters
//!
//! - [`ParamDescriptor`] - Range, default, unit and flags for one parameter
//! - [`ParamStore`] - One atomic value per parameter, written by the control thread
//! - [`ParamSource`] - Read-only access used by the audio thread
//! - [`SmoothedParam`] - One-pole smoothing for zipper-free gain changes
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! cyqnus-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use cyqnus_core::{ParamDescriptor, ParamId, ParamSource, ParamStore};
//!
//! let layout = [
//!     ParamDescriptor::seconds("Attack", "Atk", 0.001, 32.0, 0.01)
//!         .with_id(ParamId(100), "amp_attack"),
//! ];
//! let store = ParamStore::new(&layout);
//!
//! // Control thread
//! let attack = store.index_of("amp_attack").unwrap();
//! store.set(attack, 0.25);
//!
//! // Audio thread
//! assert_eq!(store.get(attack), 0.25);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod math;
pub mod param;
pub mod param_info;
pub mod param_store;

// Re-export main types at crate root
pub use math::{
    DEFAULT_SAMPLE_RATE, cents_to_ratio, db_to_linear, freq_to_midi, linear_to_db, midi_to_freq,
    sanitize_sample_rate, semitones_to_ratio,
};
pub use param::SmoothedParam;
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamUnit};
pub use param_store::{AtomicParam, ParamSource, ParamStore};
