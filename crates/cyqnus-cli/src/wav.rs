//! WAV output through hound.

use hound::{SampleFormat, WavWriter};
use std::path::Path;
use thiserror::Error;

/// Errors from writing WAV files.
#[derive(Debug, Error)]
pub enum WavError {
    /// WAV encoder error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Bit depth other than 16, 24 or 32.
    #[error("unsupported bit depth: {0} (use 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    /// Channel count does not fit the spec or channels differ in length.
    #[error("channel layout mismatch: {0}")]
    ChannelMismatch(String),
}

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth; 32 writes IEEE float, 16 and 24 write integers.
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl TryFrom<WavSpec> for hound::WavSpec {
    type Error = WavError;

    fn try_from(spec: WavSpec) -> Result<Self, WavError> {
        let sample_format = match spec.bits_per_sample {
            32 => SampleFormat::Float,
            16 | 24 => SampleFormat::Int,
            other => return Err(WavError::UnsupportedBitDepth(other)),
        };
        Ok(hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format,
        })
    }
}

/// Write planar `channels` as an interleaved WAV file.
pub fn write_wav<P: AsRef<Path>>(
    path: P,
    channels: &[Vec<f32>],
    spec: WavSpec,
) -> Result<(), WavError> {
    if channels.len() != usize::from(spec.channels) {
        return Err(WavError::ChannelMismatch(format!(
            "{} channels of data for a {}-channel file",
            channels.len(),
            spec.channels
        )));
    }
    let frames = channels.first().map_or(0, Vec::len);
    if channels.iter().any(|c| c.len() != frames) {
        return Err(WavError::ChannelMismatch(
            "channels have different lengths".to_string(),
        ));
    }

    let hound_spec = hound::WavSpec::try_from(spec)?;
    let mut writer = WavWriter::create(path, hound_spec)?;

    if spec.bits_per_sample == 32 {
        for frame in 0..frames {
            for channel in channels {
                writer.write_sample(channel[frame])?;
            }
        }
    } else {
        let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
        for frame in 0..frames {
            for channel in channels {
                let int_sample = (channel[frame] * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_stereo_float() {
        let file = NamedTempFile::new().unwrap();
        let left: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        let right: Vec<f32> = left.iter().map(|s| -s).collect();
        write_wav(file.path(), &[left.clone(), right], WavSpec::default()).unwrap();

        let mut reader = hound::WavReader::open(file.path()).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.duration(), 100);
        let samples: Vec<f32> = reader.samples::<f32>().map(Result::unwrap).collect();
        assert_eq!(samples[2], left[1]);
        assert_eq!(samples[3], -left[1]);
    }

    #[test]
    fn test_write_16_bit_clamps() {
        let file = NamedTempFile::new().unwrap();
        let spec = WavSpec {
            channels: 1,
            bits_per_sample: 16,
            ..WavSpec::default()
        };
        write_wav(file.path(), &[vec![2.0, -2.0, 0.5]], spec).unwrap();

        let mut reader = hound::WavReader::open(file.path()).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(samples, [i16::MAX, i16::MIN, 16384]);
    }

    #[test]
    fn test_rejects_bad_layouts() {
        let file = NamedTempFile::new().unwrap();
        let spec = WavSpec {
            bits_per_sample: 8,
            channels: 1,
            ..WavSpec::default()
        };
        assert!(matches!(
            write_wav(file.path(), &[vec![0.0]], spec),
            Err(WavError::UnsupportedBitDepth(8))
        ));
        assert!(matches!(
            write_wav(file.path(), &[vec![0.0]], WavSpec::default()),
            Err(WavError::ChannelMismatch(_))
        ));
        assert!(matches!(
            write_wav(file.path(), &[vec![0.0], vec![]], WavSpec::default()),
            Err(WavError::ChannelMismatch(_))
        ));
    }
}
