//! The batch analysis pipeline
//!
//! Single-threaded, synchronous, no I/O: mixdown, frame stepping at
//! `hop = max(1, round(sample_rate / fps))`, per-frame spectral novelty and
//! loudness measurement, peak picking over the full descriptor, optional
//! post-filters, tempo estimation, onset linking, and the final
//! normalization/summary pass.
//!
//! Stage order matters: the novelty function depends on the previous
//! frame's spectrum, peak picking needs the complete descriptor, and the
//! post-filters, linking, and normalization need the complete onset and
//! frame sets.

use uuid::Uuid;

use crate::analysis::source::{AudioFrame, AudioOnset, AudioSource};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::loudness;
use crate::features::novelty::NoveltyFunction;
use crate::features::peak_picking::{self, DetectedPeak};
use crate::features::postfilter;
use crate::features::spectral::SpectralAnalyzer;
use crate::features::tempo;
use crate::preprocessing::channel_mixer::{mixdown, PcmInput};

/// Run the full pipeline over decoded PCM
///
/// # Arguments
///
/// * `pcm` - Decoded samples in planar or interleaved layout
/// * `sample_rate` - Source sample rate in Hz
/// * `fps` - Analysis frame rate; one frame is produced per `1/fps` seconds
/// * `config` - Pipeline parameters
/// * `uri` - Optional source handle recorded on the result
///
/// # Errors
///
/// Returns `AnalysisError::InvalidConfig` for a non-positive `fps` or
/// `sample_rate`, a zero channel count, or an invalid `config`. Zero-length
/// PCM is valid and produces a source with no frames.
pub fn run(
    pcm: &PcmInput<'_>,
    sample_rate: u32,
    fps: f64,
    config: &AnalysisConfig,
    uri: Option<String>,
) -> Result<AudioSource, AnalysisError> {
    config.validate()?;

    if sample_rate == 0 {
        return Err(AnalysisError::InvalidConfig(
            "Sample rate must be > 0".to_string(),
        ));
    }

    if !fps.is_finite() || fps <= 0.0 {
        return Err(AnalysisError::InvalidConfig(format!(
            "Analysis frame rate must be positive, got {}",
            fps
        )));
    }

    let mono = mixdown(pcm)?;
    let total_samples = mono.len();
    let hop = ((sample_rate as f64 / fps).round() as usize).max(1);

    log::debug!(
        "Analyzing {} samples at {} Hz: fps={}, hop={}, fft_size={}",
        total_samples,
        sample_rate,
        fps,
        hop,
        config.fft_size
    );

    // Frame loop: spectral novelty alongside exact-slice loudness.
    // Workspace buffers live in the analyzer and are reused across frames.
    let mut analyzer = SpectralAnalyzer::new(config.fft_size);
    let mut novelty = NoveltyFunction::new(analyzer.bins());

    let frame_estimate = total_samples.div_ceil(hop);
    let mut frames: Vec<AudioFrame> = Vec::with_capacity(frame_estimate);
    let mut descriptor: Vec<f32> = Vec::with_capacity(frame_estimate);

    let mut index = 0usize;
    let mut start = 0usize;
    while start < total_samples {
        let exact = &mono[start..(start + hop).min(total_samples)];
        let analysis = &mono[start..(start + config.fft_size).min(total_samples)];

        descriptor.push(novelty.advance(analyzer.log_magnitudes(analysis)));

        let rms = loudness::frame_rms(exact);
        let loudness_db = loudness::rms_to_db(rms);

        frames.push(AudioFrame {
            index,
            time: (index * hop) as f64 / sample_rate as f64,
            samples: exact.to_vec(),
            bpm: 0.0,
            rms,
            rms_normalized: 0.0,
            loudness_db,
            loudness_normalized: loudness::db_to_unit(loudness_db),
            relative_loudness_normalized: 0.0,
            onset: None,
            onsets: Vec::new(),
        });

        index += 1;
        start += hop;
    }

    // Onset detection over the complete descriptor
    let refractory_frames = (config.refractory_seconds * fps).round() as usize;
    let raw_peaks = peak_picking::pick_peaks(
        &descriptor,
        config.threshold_half_window,
        config.sensitivity,
        refractory_frames,
    );
    let raw_count = raw_peaks.len();

    let mut kept = raw_peaks;
    if config.apply_hysteresis {
        kept = postfilter::apply_hysteresis(&kept, config.hysteresis_high, config.hysteresis_low);
    }
    if config.apply_min_hit_gap {
        kept = postfilter::apply_min_gap(&kept, config.min_hit_gap_frames);
    }

    log::debug!(
        "{} raw peaks, {} kept after post-filters",
        raw_count,
        kept.len()
    );

    let onset_frames: Vec<usize> = kept.iter().map(|peak| peak.frame_index).collect();
    let average_bpm = tempo::estimate_bpm(&onset_frames, fps);

    attach_onsets(&mut frames, &kept);
    normalize_frames(&mut frames, average_bpm);

    let summary = Summary::of(&frames);

    Ok(AudioSource {
        id: Uuid::new_v4(),
        uri,
        sample_rate,
        channels: pcm.channel_count(),
        duration: total_samples as f64 / sample_rate as f64,
        fps,
        frames,
        average_bpm,
        average_rms: summary.average_rms,
        average_loudness_db: summary.average_loudness_db,
        max_loudness_db: summary.max_loudness_db,
        average_onset_loudness_db: summary.average_onset_loudness_db,
    })
}

/// Build the onset values for the kept peaks, link each to its successor,
/// and hand ownership to the carrying frames
fn attach_onsets(frames: &mut [AudioFrame], kept: &[DetectedPeak]) {
    for (k, peak) in kept.iter().enumerate() {
        let (next_onset_frame, distance_to_next_onset) = match kept.get(k + 1) {
            Some(next) => (next.frame_index, next.frame_index - peak.frame_index),
            None => (0, 0),
        };

        let frame = &mut frames[peak.frame_index];
        let onset = AudioOnset {
            time: frame.time,
            frame_index: frame.index,
            descriptor: peak.descriptor,
            threshold: peak.threshold,
            descriptor_normalized: peak.descriptor_normalized,
            rms: frame.rms,
            loudness_db: frame.loudness_db,
            loudness_normalized: loudness::db_to_unit(frame.loudness_db),
            next_onset_frame,
            distance_to_next_onset,
        };

        frame.onsets.push(onset.clone());
        frame.onset = Some(onset);
    }
}

/// Fill the per-frame normalized fields and stamp the source tempo
fn normalize_frames(frames: &mut [AudioFrame], average_bpm: f32) {
    let max_rms = frames.iter().map(|f| f.rms).fold(0.0f32, f32::max);
    let max_loudness_db = frames
        .iter()
        .map(|f| f.loudness_db)
        .fold(loudness::DB_FLOOR, f32::max);
    let relative_range = max_loudness_db - loudness::DB_FLOOR;

    for frame in frames.iter_mut() {
        frame.bpm = average_bpm;
        frame.rms_normalized = if max_rms > 0.0 { frame.rms / max_rms } else { 0.0 };
        frame.relative_loudness_normalized = if relative_range > 0.0 {
            (frame.loudness_db - loudness::DB_FLOOR) / relative_range
        } else {
            0.0
        };
    }
}

/// Aggregate statistics over the finished frame list
struct Summary {
    average_rms: f32,
    average_loudness_db: f32,
    max_loudness_db: f32,
    average_onset_loudness_db: f32,
}

impl Summary {
    fn of(frames: &[AudioFrame]) -> Self {
        if frames.is_empty() {
            return Self {
                average_rms: 0.0,
                average_loudness_db: 0.0,
                max_loudness_db: loudness::DB_FLOOR,
                average_onset_loudness_db: 0.0,
            };
        }

        let count = frames.len() as f32;
        let average_rms = frames.iter().map(|f| f.rms).sum::<f32>() / count;
        let average_loudness_db = frames.iter().map(|f| f.loudness_db).sum::<f32>() / count;
        let max_loudness_db = frames
            .iter()
            .map(|f| f.loudness_db)
            .fold(loudness::DB_FLOOR, f32::max);

        let onset_frames: Vec<&AudioFrame> = frames.iter().filter(|f| f.has_onset()).collect();
        let average_onset_loudness_db = if onset_frames.is_empty() {
            0.0
        } else {
            onset_frames.iter().map(|f| f.loudness_db).sum::<f32>() / onset_frames.len() as f32
        };

        Self {
            average_rms,
            average_loudness_db,
            max_loudness_db,
            average_onset_loudness_db,
        }
    }
}
