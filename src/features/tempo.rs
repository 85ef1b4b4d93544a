//! Tempo estimation from inter-onset intervals
//!
//! The source tempo is the median inter-onset interval converted to BPM and
//! octave-normalized (halved/doubled) into the plausible [60, 180] range.
//! Intervals faster than 300 BPM are treated as detection noise and
//! discarded before the median.

/// Intervals shorter than this (300 BPM) do not contribute to the estimate
const MIN_INTERVAL_SECONDS: f64 = 60.0 / 300.0;

/// Octave-normalization bounds for the final estimate
const MAX_BPM: f64 = 180.0;
const MIN_BPM: f64 = 60.0;

/// Estimate tempo in BPM from sorted onset frame indices
///
/// Returns 0 when fewer than two onsets exist, the frame rate is not
/// positive, or every interval is discarded; a zero tempo marks a source
/// without a usable pulse rather than an error.
pub fn estimate_bpm(onset_frames: &[usize], fps: f64) -> f32 {
    if onset_frames.len() <= 1 || !fps.is_finite() || fps <= 0.0 {
        return 0.0;
    }

    let mut intervals: Vec<f64> = onset_frames
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as f64 / fps)
        .filter(|dt| dt.is_finite() && *dt >= MIN_INTERVAL_SECONDS)
        .collect();

    if intervals.is_empty() {
        log::debug!("No usable inter-onset intervals, tempo defaults to 0");
        return 0.0;
    }

    intervals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = intervals[intervals.len() / 2];

    let mut bpm = 60.0 / median;
    if !bpm.is_finite() || bpm <= 0.0 {
        return 0.0;
    }

    while bpm > MAX_BPM {
        bpm *= 0.5;
    }
    while bpm < MIN_BPM {
        bpm *= 2.0;
    }

    if bpm.is_finite() {
        bpm as f32
    } else {
        0.0
    }
}
