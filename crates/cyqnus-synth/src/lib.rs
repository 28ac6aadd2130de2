//! Cyqnus Synth - polyphonic AHDSR synthesis engine
//!
//! This crate turns note events into audio: each [`Voice`] runs one
//! [`AhdsrEnvelope`] over a small bank of naive [`Oscillator`]s, and a
//! [`VoicePool`] mixes up to `VOICES` of them into an [`AudioBuffer`].
//!
//! # Core Components
//!
//! ## Oscillators
//!
//! - [`Oscillator`] - Phase accumulator with coarse/fine tuning and detune
//! - [`OscillatorWaveform`] - Sine, Saw, Square, Triangle, Pulse, Noise
//!
//! ## Envelopes
//!
//! - [`AhdsrEnvelope`] - Linear Attack-Hold-Decay-Sustain-Release envelope
//! - [`EnvelopeState`] - Envelope stage tracking
//!
//! ## Voice Management
//!
//! - [`Voice`] - One note: envelope x averaged oscillators x velocity
//! - [`VoicePool`] - First-free allocation, no stealing
//! - [`TimedEvent`] / [`NoteEvent`] - Sample-accurate note events
//!
//! ## Parameters
//!
//! - [`PARAM_LAYOUT`] - Descriptor table for every synth parameter
//! - [`PatchSnapshot`] - Settings frozen at note-on from a [`ParamSource`](cyqnus_core::ParamSource)
//!
//! # Real-time Safety
//!
//! Rendering never allocates, locks or blocks. Buffers are allocated at
//! setup; parameters are read through lock-free atomics.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! cyqnus-synth = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use cyqnus_core::ParamStore;
//! use cyqnus_synth::{AudioBuffer, PARAM_LAYOUT, TimedEvent, VoicePool, params};
//!
//! let store = ParamStore::new(&PARAM_LAYOUT);
//! store.set(params::AMP_SUSTAIN, 1.0);
//! store.set(params::osc_param(0, params::OSC_WAVE), 1.0); // Saw
//!
//! let mut synth: VoicePool<8, 3> = VoicePool::new(44100.0);
//! let mut block = AudioBuffer::new(2, 512);
//!
//! block.clear();
//! synth.render_block(&mut block, &[TimedEvent::note_on(0, 57, 0.9)], &store);
//! assert!(block.peak() > 0.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod buffer;
pub mod envelope;
pub mod event;
pub mod oscillator;
pub mod params;
pub mod pool;
pub mod sound;
pub mod voice;

pub use buffer::AudioBuffer;
pub use envelope::{AhdsrEnvelope, AhdsrParams, EnvelopeState};
pub use event::{NoteEvent, TimedEvent};
pub use oscillator::{Oscillator, OscillatorParams, OscillatorWaveform};
pub use params::{MAX_OSCILLATORS, PARAM_COUNT, PARAM_LAYOUT, PatchSnapshot};
pub use pool::VoicePool;
pub use sound::SynthSound;
pub use voice::Voice;

/// Default deployment: 8 voices, 3 oscillators each.
pub type Synth = VoicePool<8, 3>;
