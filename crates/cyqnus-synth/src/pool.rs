//! Fixed-size polyphonic voice pool.
//!
//! Notes go to the first free voice. When every voice is busy the note is
//! dropped: there is no voice stealing.

use cyqnus_core::{ParamSource, sanitize_sample_rate};

use crate::buffer::AudioBuffer;
use crate::event::{NoteEvent, TimedEvent};
use crate::params::PatchSnapshot;
use crate::sound::SynthSound;
use crate::voice::Voice;

/// Polyphonic pool of `VOICES` voices with `OSCS` oscillators each.
///
/// # Example
///
/// ```rust
/// use cyqnus_core::ParamStore;
/// use cyqnus_synth::{AudioBuffer, PARAM_LAYOUT, TimedEvent, VoicePool};
///
/// let params = ParamStore::new(&PARAM_LAYOUT);
/// let mut pool: VoicePool<8, 3> = VoicePool::new(48000.0);
/// let mut buffer = AudioBuffer::new(2, 256);
///
/// let events = [
///     TimedEvent::note_on(0, 60, 0.8),
///     TimedEvent::note_on(64, 64, 0.8),
///     TimedEvent::note_off(200, 60, true),
/// ];
/// pool.render_block(&mut buffer, &events, &params);
///
/// assert_eq!(pool.active_voice_count(), 2);
/// assert!(buffer.peak() > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct VoicePool<const VOICES: usize, const OSCS: usize> {
    voices: [Voice<OSCS>; VOICES],
    sound: SynthSound,
    sample_rate: f32,
}

impl<const VOICES: usize, const OSCS: usize> Default for VoicePool<VOICES, OSCS> {
    fn default() -> Self {
        Self::new(cyqnus_core::DEFAULT_SAMPLE_RATE)
    }
}

impl<const VOICES: usize, const OSCS: usize> VoicePool<VOICES, OSCS> {
    /// Create a pool of idle voices, each with its own noise seed.
    pub fn new(sample_rate: f32) -> Self {
        let sample_rate = sanitize_sample_rate(sample_rate);
        Self {
            voices: core::array::from_fn(|i| {
                let mut voice = Voice::new(sample_rate);
                voice.seed_noise(i as u32 + 1);
                voice
            }),
            sound: SynthSound,
            sample_rate,
        }
    }

    /// Set sample rate for all voices. Safe to repeat with the same value.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sanitize_sample_rate(sample_rate);
        for voice in &mut self.voices {
            voice.set_sample_rate(self.sample_rate);
        }
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Get number of voices.
    pub fn voice_count(&self) -> usize {
        VOICES
    }

    /// Get number of active voices.
    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Get read access to all voices.
    pub fn voices(&self) -> &[Voice<OSCS>; VOICES] {
        &self.voices
    }

    /// Start `note` on the first free voice.
    ///
    /// Returns the voice index, or `None` if every voice is busy and the
    /// note was dropped.
    pub fn note_on(
        &mut self,
        note: u8,
        velocity: f32,
        snapshot: &PatchSnapshot<OSCS>,
    ) -> Option<usize> {
        if !self.sound.applies_to_note(note) {
            return None;
        }

        let sound = &self.sound;
        let Some(index) = self
            .voices
            .iter()
            .position(|v| v.can_play_sound(sound) && !v.is_active())
        else {
            #[cfg(feature = "tracing")]
            tracing::debug!(note, "no free voice, note dropped");
            return None;
        };

        self.voices[index].start_note(note, velocity, snapshot);
        Some(index)
    }

    /// Stop every voice playing `note`.
    ///
    /// With `allow_tail_off`, voices already releasing are left alone.
    pub fn note_off(&mut self, note: u8, allow_tail_off: bool) {
        for voice in &mut self.voices {
            if voice.is_active() && voice.note() == Some(note) {
                if allow_tail_off && voice.is_releasing() {
                    continue;
                }
                voice.stop_note(allow_tail_off);
            }
        }
    }

    /// Stop every sounding voice.
    pub fn all_notes_off(&mut self, allow_tail_off: bool) {
        for voice in &mut self.voices {
            if voice.is_active() && !(allow_tail_off && voice.is_releasing()) {
                voice.stop_note(allow_tail_off);
            }
        }
    }

    /// Hard stop every voice.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.reset();
        }
    }

    /// Add every active voice's output for `len` frames from `start`.
    pub fn render(&mut self, buffer: &mut AudioBuffer, start: usize, len: usize) {
        for voice in &mut self.voices {
            if voice.is_active() {
                voice.render(buffer, start, len);
            }
        }
    }

    /// Render a whole block, applying `events` at their sample offsets.
    ///
    /// Events must be sorted by offset. Offsets past the end of the block
    /// apply at the end; offsets behind an earlier event apply at that
    /// event's position. Note-ons read their [`PatchSnapshot`] from
    /// `params` when they are applied.
    pub fn render_block<S>(&mut self, buffer: &mut AudioBuffer, events: &[TimedEvent], params: &S)
    where
        S: ParamSource + ?Sized,
    {
        let frames = buffer.frames();
        let mut cursor = 0;

        for timed in events {
            let at = timed.offset.min(frames).max(cursor);
            if at > cursor {
                self.render(buffer, cursor, at - cursor);
                cursor = at;
            }
            self.handle_event(timed.event, params);
        }

        if cursor < frames {
            self.render(buffer, cursor, frames - cursor);
        }
    }

    /// Apply one event immediately.
    pub fn handle_event<S>(&mut self, event: NoteEvent, params: &S)
    where
        S: ParamSource + ?Sized,
    {
        match event {
            NoteEvent::NoteOn { note, velocity } => {
                let snapshot = PatchSnapshot::read(params);
                self.note_on(note, velocity, &snapshot);
            }
            NoteEvent::NoteOff {
                note,
                allow_tail_off,
            } => self.note_off(note, allow_tail_off),
            NoteEvent::AllNotesOff { allow_tail_off } => self.all_notes_off(allow_tail_off),
        }
    }
}
