//! The single sound type voices can play.

/// Descriptor for the one sound the synth provides.
///
/// Every voice can play it on every note; it exists so allocation keeps an
/// explicit compatibility check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SynthSound;

impl SynthSound {
    /// Whether this sound responds to `note`. Always `true`.
    pub fn applies_to_note(&self, _note: u8) -> bool {
        true
    }
}
