//! Note events with sample offsets inside a block.

/// A note event, already translated from MIDI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NoteEvent {
    /// Start a note. `velocity` is in `[0, 1]`.
    NoteOn {
        /// MIDI note number (0-127).
        note: u8,
        /// Normalised velocity.
        velocity: f32,
    },
    /// Stop every voice playing `note`.
    NoteOff {
        /// MIDI note number (0-127).
        note: u8,
        /// Release through the envelope (`true`) or cut immediately.
        allow_tail_off: bool,
    },
    /// Stop every voice.
    AllNotesOff {
        /// Release through the envelope (`true`) or cut immediately.
        allow_tail_off: bool,
    },
}

/// A [`NoteEvent`] at a sample offset from the start of the block.
///
/// Blocks expect their events sorted by `offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedEvent {
    /// Sample offset within the block.
    pub offset: usize,
    /// The event.
    pub event: NoteEvent,
}

impl TimedEvent {
    /// Note-on at `offset`.
    pub fn note_on(offset: usize, note: u8, velocity: f32) -> Self {
        Self {
            offset,
            event: NoteEvent::NoteOn { note, velocity },
        }
    }

    /// Note-off at `offset`.
    pub fn note_off(offset: usize, note: u8, allow_tail_off: bool) -> Self {
        Self {
            offset,
            event: NoteEvent::NoteOff {
                note,
                allow_tail_off,
            },
        }
    }

    /// All-notes-off at `offset`.
    pub fn all_notes_off(offset: usize, allow_tail_off: bool) -> Self {
        Self {
            offset,
            event: NoteEvent::AllNotesOff { allow_tail_off },
        }
    }
}
