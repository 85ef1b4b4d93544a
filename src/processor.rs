//! Processing capability surface
//!
//! The two operations the crate exposes to callers, behind one trait so
//! applications can swap in alternative strategies (or mocks) without a
//! class hierarchy.

use std::path::PathBuf;

use crate::analysis::pipeline;
use crate::analysis::source::AudioSource;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::io::combine::{combine_tracks, AudioUri};
use crate::preprocessing::channel_mixer::PcmInput;

/// Capability set for audio processing: build an [`AudioSource`] from
/// decoded PCM, or concatenate tracks into a single file
pub trait AudioProcessor {
    /// Run onset and loudness analysis over decoded PCM
    fn process(
        &self,
        pcm: &PcmInput<'_>,
        sample_rate: u32,
        fps: f64,
    ) -> Result<AudioSource, AnalysisError>;

    /// Concatenate audio tracks in order into a single output file
    fn combine(&self, inputs: &[PathBuf], fps: f64) -> Result<AudioUri, AnalysisError>;
}

/// The default strategy: the batch onset pipeline with a stored configuration
#[derive(Debug, Clone, Default)]
pub struct DefaultProcessor {
    /// Pipeline parameters used by every `process` call
    pub config: AnalysisConfig,
}

impl DefaultProcessor {
    /// Create a processor with the given configuration
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }
}

impl AudioProcessor for DefaultProcessor {
    fn process(
        &self,
        pcm: &PcmInput<'_>,
        sample_rate: u32,
        fps: f64,
    ) -> Result<AudioSource, AnalysisError> {
        pipeline::run(pcm, sample_rate, fps, &self.config, None)
    }

    fn combine(&self, inputs: &[PathBuf], fps: f64) -> Result<AudioUri, AnalysisError> {
        combine_tracks(inputs, fps)
    }
}
