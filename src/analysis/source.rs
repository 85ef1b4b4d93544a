//! Analysis result value types
//!
//! The pipeline produces one [`AudioSource`] per invocation: a plain,
//! serializable value with no interior mutability and no back-references.
//! Frames own their onsets; "next onset" links are scalar frame indices.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A detected transient event, owned by its carrying frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioOnset {
    /// Onset time in seconds (equal to the carrying frame's time)
    pub time: f64,

    /// Index of the carrying frame
    pub frame_index: usize,

    /// Raw novelty descriptor value at detection
    pub descriptor: f32,

    /// Adaptive threshold at detection
    pub threshold: f32,

    /// Descriptor scaled into [0, 1] over the source's observed range
    pub descriptor_normalized: f32,

    /// RMS of the carrying frame
    pub rms: f32,

    /// Loudness of the carrying frame in dB
    pub loudness_db: f32,

    /// Loudness mapped onto the fixed [-60, 0] dB window as [0, 1]
    pub loudness_normalized: f32,

    /// Frame index of the next onset in the source, 0 when this is the last
    pub next_onset_frame: usize,

    /// Distance to the next onset in frames, 0 when this is the last
    pub distance_to_next_onset: usize,
}

/// One analysis step of the source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFrame {
    /// Zero-based frame index, contiguous from 0
    pub index: usize,

    /// Frame start time in seconds (`index * hop / sample_rate`)
    pub time: f64,

    /// The exact hop-length sample slice this frame measured
    ///
    /// The zero-padded FFT window is transient and not retained.
    pub samples: Vec<f32>,

    /// Source-average tempo stamped onto every frame
    pub bpm: f32,

    /// Root-mean-square of `samples`
    pub rms: f32,

    /// RMS scaled by the source's maximum frame RMS
    pub rms_normalized: f32,

    /// Loudness in dB, floored at -140 for silence
    pub loudness_db: f32,

    /// Loudness mapped onto the fixed [-60, 0] dB window as [0, 1]
    pub loudness_normalized: f32,

    /// Loudness relative to the source's observed maximum, over a -140 dB floor
    pub relative_loudness_normalized: f32,

    /// Primary onset carried by this frame, if any
    pub onset: Option<AudioOnset>,

    /// All onsets carried by this frame (usually zero or one)
    pub onsets: Vec<AudioOnset>,
}

impl AudioFrame {
    /// Whether this frame carries an onset
    pub fn has_onset(&self) -> bool {
        self.onset.is_some()
    }
}

/// Aggregate result of analyzing one audio source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSource {
    /// Stable identifier for this analysis result
    pub id: Uuid,

    /// Originating source handle, when the caller supplied one
    pub uri: Option<String>,

    /// Sample rate of the source in Hz
    pub sample_rate: u32,

    /// Channel count of the original source before mixdown
    pub channels: usize,

    /// Total duration in seconds
    pub duration: f64,

    /// Analysis frame rate the source was processed at
    pub fps: f64,

    /// One frame per analysis step, in time order
    pub frames: Vec<AudioFrame>,

    /// Source-average tempo in BPM; 0 when no usable pulse was found
    pub average_bpm: f32,

    /// Mean frame RMS
    pub average_rms: f32,

    /// Mean frame loudness in dB
    pub average_loudness_db: f32,

    /// Maximum frame loudness in dB (-140 for an empty or silent source)
    pub max_loudness_db: f32,

    /// Mean loudness over onset-carrying frames only, 0 when there are none
    pub average_onset_loudness_db: f32,
}

impl AudioSource {
    /// Iterate all onsets in frame order
    pub fn onsets(&self) -> impl Iterator<Item = &AudioOnset> {
        self.frames.iter().flat_map(|frame| frame.onsets.iter())
    }

    /// Total number of onsets in the source
    pub fn onset_count(&self) -> usize {
        self.frames.iter().map(|frame| frame.onsets.len()).sum()
    }
}
