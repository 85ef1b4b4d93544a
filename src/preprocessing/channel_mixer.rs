//! Channel mixdown (multi-channel PCM to mono)
//!
//! The analysis pipeline operates on a single mono signal. Mixdown policy
//! is the per-sample arithmetic mean of all channels; an average of bounded
//! inputs is bounded, so no clipping stage is applied.

use crate::error::AnalysisError;

/// Decoded PCM handed to the pipeline, in either of the two layouts
/// decoders commonly produce.
#[derive(Debug, Clone)]
pub enum PcmInput<'a> {
    /// One sample slice per channel; channels are expected to share a length
    Planar(&'a [Vec<f32>]),

    /// Frame-interleaved samples (`L R L R ...` for stereo)
    Interleaved {
        /// Interleaved sample data
        samples: &'a [f32],
        /// Number of interleaved channels
        channels: usize,
    },
}

impl PcmInput<'_> {
    /// Number of channels in the buffer
    pub fn channel_count(&self) -> usize {
        match self {
            PcmInput::Planar(channels) => channels.len(),
            PcmInput::Interleaved { channels, .. } => *channels,
        }
    }

    /// Number of per-channel sample frames in the buffer
    pub fn frame_count(&self) -> usize {
        match self {
            PcmInput::Planar(channels) => {
                channels.iter().map(|c| c.len()).min().unwrap_or(0)
            }
            PcmInput::Interleaved { samples, channels } => {
                if *channels == 0 {
                    0
                } else {
                    samples.len() / channels
                }
            }
        }
    }
}

/// Reduce PCM to a mono buffer by per-sample mean
///
/// Single-channel input passes through unchanged. For planar input with
/// unequal channel lengths, the shortest channel bounds the output; for
/// interleaved input, a trailing partial frame is dropped.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidConfig` if the input declares zero channels.
pub fn mixdown(input: &PcmInput<'_>) -> Result<Vec<f32>, AnalysisError> {
    match input {
        PcmInput::Planar(channels) => {
            if channels.is_empty() {
                return Err(AnalysisError::InvalidConfig(
                    "PCM input has no channels".to_string(),
                ));
            }

            if channels.len() == 1 {
                return Ok(channels[0].clone());
            }

            let frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);
            if channels.iter().any(|c| c.len() != frames) {
                log::warn!(
                    "Planar channels have unequal lengths, truncating to {} frames",
                    frames
                );
            }

            let scale = 1.0 / channels.len() as f32;
            let mut mono = Vec::with_capacity(frames);
            for i in 0..frames {
                let sum: f32 = channels.iter().map(|c| c[i]).sum();
                mono.push(sum * scale);
            }
            Ok(mono)
        }
        PcmInput::Interleaved { samples, channels } => {
            if *channels == 0 {
                return Err(AnalysisError::InvalidConfig(
                    "PCM input has no channels".to_string(),
                ));
            }

            if *channels == 1 {
                return Ok(samples.to_vec());
            }

            if samples.len() % channels != 0 {
                log::warn!(
                    "Interleaved buffer length {} is not a multiple of {} channels, dropping partial frame",
                    samples.len(),
                    channels
                );
            }

            let scale = 1.0 / *channels as f32;
            Ok(samples
                .chunks_exact(*channels)
                .map(|frame| frame.iter().sum::<f32>() * scale)
                .collect())
        }
    }
}
