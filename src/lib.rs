//! # Onset DSP
//!
//! An offline onset-detection and feature-extraction engine: decoded PCM
//! goes in, a time-series of per-frame energy/loudness measurements plus
//! detected transient events with tempo and timing metadata comes out.
//!
//! ## Features
//!
//! - **Onset detection**: high-frequency-weighted spectral-flux novelty
//!   with centered adaptive peak picking and optional hysteresis/min-gap
//!   post-filters
//! - **Loudness timeline**: RMS and dB per analysis frame, normalized
//!   against the source
//! - **Tempo**: median inter-onset interval, octave-normalized into
//!   [60, 180] BPM
//! - **I/O edges**: Symphonia decoding and WAV track concatenation
//!
//! ## Quick Start
//!
//! ```no_run
//! use onset_dsp::{analyze_audio, AnalysisConfig, PcmInput};
//!
//! let samples: Vec<f32> = vec![0.0; 48_000]; // Your decoded audio
//! let pcm = PcmInput::Interleaved { samples: &samples, channels: 1 };
//!
//! let source = analyze_audio(&pcm, 48_000, 60.0, AnalysisConfig::default())?;
//!
//! println!(
//!     "{} frames, {} onsets, {:.1} BPM",
//!     source.frames.len(),
//!     source.onset_count(),
//!     source.average_bpm
//! );
//! # Ok::<(), onset_dsp::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! The pipeline is a synchronous batch computation:
//!
//! ```text
//! PCM -> Mixdown -> Frame Stepping -> (Spectral Flux | RMS/dB)
//!     -> Peak Picking -> Post-filters -> Tempo -> Linking/Normalization
//!     -> AudioSource
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;
pub mod processor;

use std::path::Path;

// Re-export main types
pub use analysis::source::{AudioFrame, AudioOnset, AudioSource};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use io::combine::AudioUri;
pub use preprocessing::channel_mixer::PcmInput;
pub use processor::{AudioProcessor, DefaultProcessor};

/// Analyze decoded PCM into an [`AudioSource`]
///
/// # Arguments
///
/// * `pcm` - Decoded samples in planar or interleaved layout
/// * `sample_rate` - Sample rate in Hz (typically 44100 or 48000)
/// * `fps` - Analysis frame rate; one frame per `1/fps` seconds
/// * `config` - Pipeline parameters
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidConfig`] for a non-positive `fps` or
/// sample rate, a zero channel count, or an invalid configuration.
/// Zero-length PCM is valid and yields a source with no frames.
///
/// # Example
///
/// ```no_run
/// use onset_dsp::{analyze_audio, AnalysisConfig, PcmInput};
///
/// let samples = vec![0.0f32; 48_000 * 30]; // 30 seconds of silence
/// let pcm = PcmInput::Interleaved { samples: &samples, channels: 1 };
/// let source = analyze_audio(&pcm, 48_000, 60.0, AnalysisConfig::default())?;
/// # Ok::<(), onset_dsp::AnalysisError>(())
/// ```
pub fn analyze_audio(
    pcm: &PcmInput<'_>,
    sample_rate: u32,
    fps: f64,
    config: AnalysisConfig,
) -> Result<AudioSource, AnalysisError> {
    analysis::pipeline::run(pcm, sample_rate, fps, &config, None)
}

/// Decode an audio file and analyze it into an [`AudioSource`]
///
/// Convenience wrapper over [`io::decoder::decode_file`] and
/// [`analyze_audio`]; the file path is recorded as the source URI.
///
/// # Errors
///
/// Returns [`AnalysisError::DecodeFailed`] if the file cannot be decoded,
/// or any error [`analyze_audio`] can return.
pub fn analyze_file(
    path: &Path,
    fps: f64,
    config: AnalysisConfig,
) -> Result<AudioSource, AnalysisError> {
    let decoded = io::decoder::decode_file(path)?;
    analysis::pipeline::run(
        &decoded.as_pcm(),
        decoded.sample_rate,
        fps,
        &config,
        Some(path.display().to_string()),
    )
}
