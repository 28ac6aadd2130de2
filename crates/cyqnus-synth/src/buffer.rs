//! Multi-channel output buffer.
//!
//! Channels are stored planar in one allocation made at setup. The engine
//! only ever adds into the buffer; clearing between blocks is the caller's
//! job.

use alloc::vec;
use alloc::vec::Vec;

/// Planar block of `f32` samples, at least one channel wide.
///
/// # Example
///
/// ```rust
/// use cyqnus_synth::AudioBuffer;
///
/// let mut buffer = AudioBuffer::new(2, 4);
/// buffer.add_frame(1, 0.5);
/// assert_eq!(buffer.channel(0), &[0.0, 0.5, 0.0, 0.0]);
/// assert_eq!(buffer.channel(1), &[0.0, 0.5, 0.0, 0.0]);
///
/// buffer.clear();
/// assert!(buffer.channel(1).iter().all(|&s| s == 0.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    data: Vec<f32>,
    channels: usize,
    frames: usize,
}

impl AudioBuffer {
    /// Allocate a zeroed buffer. Zero channels is raised to one.
    pub fn new(channels: usize, frames: usize) -> Self {
        let channels = channels.max(1);
        Self {
            data: vec![0.0; channels * frames],
            channels,
            frames,
        }
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Zero every sample.
    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    /// Change the frame count, zeroing the contents. Allocates if growing.
    pub fn resize(&mut self, frames: usize) {
        self.frames = frames;
        self.data.clear();
        self.data.resize(self.channels * frames, 0.0);
    }

    /// Samples of one channel.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= self.channels()`.
    pub fn channel(&self, channel: usize) -> &[f32] {
        assert!(channel < self.channels, "channel {} out of range", channel);
        let start = channel * self.frames;
        &self.data[start..start + self.frames]
    }

    /// Mutable samples of one channel.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= self.channels()`.
    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        assert!(channel < self.channels, "channel {} out of range", channel);
        let start = channel * self.frames;
        &mut self.data[start..start + self.frames]
    }

    /// Add `sample` at `frame` into every channel. Out-of-range frames are
    /// ignored.
    #[inline]
    pub fn add_frame(&mut self, frame: usize, sample: f32) {
        if frame >= self.frames {
            return;
        }
        for ch in 0..self.channels {
            self.data[ch * self.frames + frame] += sample;
        }
    }

    /// Multiply one frame across all channels by `gain`.
    #[inline]
    pub fn scale_frame(&mut self, frame: usize, gain: f32) {
        if frame >= self.frames {
            return;
        }
        for ch in 0..self.channels {
            self.data[ch * self.frames + frame] *= gain;
        }
    }

    /// Largest absolute sample value across all channels.
    pub fn peak(&self) -> f32 {
        self.data.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }
}
