//! Track concatenation
//!
//! Decodes a list of tracks and writes them back to back into a single
//! 16-bit PCM WAV file. Every track is mixed to mono; all tracks must share
//! one sample rate. The output lands in the OS temp directory under a
//! unique name.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::io::decoder;
use crate::preprocessing::channel_mixer::mixdown;

/// Location of a combined audio file produced by [`combine_tracks`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioUri {
    /// Path of the written file
    pub path: PathBuf,
}

/// Concatenate audio tracks in order into a single WAV file
///
/// `fps` is validated the same way the analysis entry point validates it,
/// so a caller that later analyzes the combined file fails early here; it
/// does not affect the written audio.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidConfig` for a non-positive `fps`, an
/// empty input list, or inputs with differing sample rates, and
/// `AnalysisError::DecodeFailed` if decoding an input or writing the output
/// fails.
pub fn combine_tracks(inputs: &[PathBuf], fps: f64) -> Result<AudioUri, AnalysisError> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(AnalysisError::InvalidConfig(format!(
            "Analysis frame rate must be positive, got {}",
            fps
        )));
    }

    if inputs.is_empty() {
        return Err(AnalysisError::InvalidConfig(
            "No input tracks to combine".to_string(),
        ));
    }

    let mut sample_rate = 0u32;
    let mut mono: Vec<f32> = Vec::new();

    for path in inputs {
        let decoded = decoder::decode_file(path)?;

        if sample_rate == 0 {
            sample_rate = decoded.sample_rate;
        } else if decoded.sample_rate != sample_rate {
            return Err(AnalysisError::InvalidConfig(format!(
                "Sample rate mismatch: {} is {} Hz, expected {} Hz",
                path.display(),
                decoded.sample_rate,
                sample_rate
            )));
        }

        let track = mixdown(&decoded.as_pcm())?;
        mono.extend_from_slice(&track);
    }

    let output = std::env::temp_dir().join(format!("combined-{}.wav", Uuid::new_v4()));

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(&output, spec).map_err(|e| {
        AnalysisError::DecodeFailed(format!("Failed to create {}: {}", output.display(), e))
    })?;

    for &sample in &mono {
        let quantized = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
        writer.write_sample(quantized).map_err(|e| {
            AnalysisError::DecodeFailed(format!("Failed to write {}: {}", output.display(), e))
        })?;
    }

    writer.finalize().map_err(|e| {
        AnalysisError::DecodeFailed(format!("Failed to finalize {}: {}", output.display(), e))
    })?;

    log::debug!(
        "Combined {} tracks ({} samples at {} Hz) into {}",
        inputs.len(),
        mono.len(),
        sample_rate,
        output.display()
    );

    Ok(AudioUri { path: output })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_list_rejected() {
        let result = combine_tracks(&[], 60.0);
        assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn test_non_positive_fps_rejected() {
        let inputs = vec![PathBuf::from("/tmp/a.wav")];
        for fps in [0.0, -1.0, f64::NAN] {
            let result = combine_tracks(&inputs, fps);
            assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_missing_input_is_decode_failure() {
        let inputs = vec![PathBuf::from("/nonexistent/a.wav")];
        let result = combine_tracks(&inputs, 60.0);
        assert!(matches!(result, Err(AnalysisError::DecodeFailed(_))));
    }
}
