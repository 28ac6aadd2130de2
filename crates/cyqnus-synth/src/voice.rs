//! A single synth voice: one envelope driving a bank of oscillators.

use cyqnus_core::{midi_to_freq, sanitize_sample_rate};

use crate::buffer::AudioBuffer;
use crate::envelope::{AhdsrEnvelope, EnvelopeState};
use crate::oscillator::Oscillator;
use crate::params::{MAX_OSCILLATORS, PatchSnapshot};
use crate::sound::SynthSound;

/// Highest MIDI note number.
pub const MAX_NOTE: u8 = 127;

/// One voice with `OSCS` oscillators summed at equal weight.
///
/// A voice is reused across notes. It is free exactly when its envelope is
/// idle.
///
/// # Example
///
/// ```rust
/// use cyqnus_synth::{AudioBuffer, PatchSnapshot, Voice};
///
/// let mut voice: Voice<3> = Voice::new(48000.0);
/// voice.start_note(69, 1.0, &PatchSnapshot::default());
/// assert!(voice.is_active());
///
/// let mut buffer = AudioBuffer::new(2, 64);
/// voice.render(&mut buffer, 0, 64);
/// assert!(buffer.peak() > 0.0);
///
/// voice.stop_note(false);
/// assert!(!voice.is_active());
/// ```
#[derive(Debug, Clone)]
pub struct Voice<const OSCS: usize> {
    envelope: AhdsrEnvelope,
    oscillators: [Oscillator; OSCS],
    /// Base frequency of the current note in Hz
    frequency: f32,
    velocity: f32,
    note: Option<u8>,
    sample_rate: f32,
}

impl<const OSCS: usize> Default for Voice<OSCS> {
    fn default() -> Self {
        Self::new(cyqnus_core::DEFAULT_SAMPLE_RATE)
    }
}

impl<const OSCS: usize> Voice<OSCS> {
    const VALID_OSCILLATOR_COUNT: () = assert!(
        OSCS >= 1 && OSCS <= MAX_OSCILLATORS,
        "a voice needs between 1 and MAX_OSCILLATORS oscillators"
    );

    const MIX_SCALE: f32 = 1.0 / OSCS as f32;

    /// Create an idle voice.
    pub fn new(sample_rate: f32) -> Self {
        let () = Self::VALID_OSCILLATOR_COUNT;
        let sample_rate = sanitize_sample_rate(sample_rate);
        Self {
            envelope: AhdsrEnvelope::new(sample_rate),
            oscillators: core::array::from_fn(|_| Oscillator::new(sample_rate)),
            frequency: 0.0,
            velocity: 0.0,
            note: None,
            sample_rate,
        }
    }

    /// Give each oscillator its own noise sequence derived from `seed`.
    pub fn seed_noise(&mut self, seed: u32) {
        for (k, osc) in self.oscillators.iter_mut().enumerate() {
            osc.set_noise_seed(
                seed.wrapping_mul(0x9E37_79B9)
                    .wrapping_add(k as u32 + 1),
            );
        }
    }

    /// Set sample rate for the envelope and every oscillator.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sanitize_sample_rate(sample_rate);
        self.envelope.set_sample_rate(self.sample_rate);
        for osc in &mut self.oscillators {
            osc.set_sample_rate(self.sample_rate);
        }
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Whether this voice can play `sound`. Always `true`: there is only
    /// one sound type.
    pub fn can_play_sound(&self, _sound: &SynthSound) -> bool {
        true
    }

    /// Start a note with settings frozen from `snapshot`.
    ///
    /// `note` clamps to 127, `velocity` to `[0, 1]`. Oscillator phases
    /// restart at zero.
    pub fn start_note(&mut self, note: u8, velocity: f32, snapshot: &PatchSnapshot<OSCS>) {
        let note = note.min(MAX_NOTE);
        self.note = Some(note);
        self.frequency = midi_to_freq(note);
        self.velocity = if velocity.is_nan() {
            0.0
        } else {
            velocity.clamp(0.0, 1.0)
        };

        for (osc, params) in self.oscillators.iter_mut().zip(&snapshot.oscillators) {
            osc.reset();
            osc.apply(params);
            osc.set_frequency(self.frequency);
        }

        self.envelope.set_params(snapshot.envelope);
        self.envelope.note_on();
    }

    /// Stop the current note.
    ///
    /// With `allow_tail_off` the envelope enters its release stage;
    /// otherwise the voice is silenced and freed at once.
    pub fn stop_note(&mut self, allow_tail_off: bool) {
        if allow_tail_off {
            self.envelope.note_off();
        } else {
            self.envelope.reset();
            self.note = None;
        }
    }

    /// Hard stop and forget the note.
    pub fn reset(&mut self) {
        self.envelope.reset();
        for osc in &mut self.oscillators {
            osc.reset();
        }
        self.note = None;
    }

    /// Check if voice is sounding (envelope not idle).
    #[inline]
    pub fn is_active(&self) -> bool {
        self.envelope.is_active()
    }

    /// Check if the voice is in its release tail.
    pub fn is_releasing(&self) -> bool {
        self.envelope.state() == EnvelopeState::Release
    }

    /// Note being played, `None` once the voice is free.
    pub fn note(&self) -> Option<u8> {
        self.note
    }

    /// Base frequency of the current (or last) note in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Velocity of the current (or last) note.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// The amplitude envelope.
    pub fn envelope(&self) -> &AhdsrEnvelope {
        &self.envelope
    }

    /// The oscillator bank.
    pub fn oscillators(&self) -> &[Oscillator; OSCS] {
        &self.oscillators
    }

    /// Add `len` samples starting at frame `start` into every channel of
    /// `buffer`. The range is clipped to the buffer.
    pub fn render(&mut self, buffer: &mut AudioBuffer, start: usize, len: usize) {
        if !self.envelope.is_active() {
            self.note = None;
            return;
        }

        let end = start.saturating_add(len).min(buffer.frames());
        for frame in start..end {
            let mut mix = 0.0;
            for osc in &mut self.oscillators {
                mix += osc.advance();
            }
            let gain = self.envelope.advance();
            buffer.add_frame(frame, mix * Self::MIX_SCALE * gain * self.velocity);

            if !self.envelope.is_active() {
                break;
            }
        }

        if !self.envelope.is_active() {
            self.note = None;
        }
    }
}
