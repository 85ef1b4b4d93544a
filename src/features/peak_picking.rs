//! Centered adaptive-threshold peak picking
//!
//! Scans the novelty descriptor for local maxima that clear a threshold
//! derived from the surrounding frames:
//! 1. For each candidate frame, average the descriptor over a centered
//!    window, excluding the candidate itself
//! 2. Scale that local mean by the configured sensitivity
//! 3. Accept the frame iff it exceeds the threshold, strictly exceeds both
//!    neighbors, and falls outside the refractory span of the last accept
//!
//! The first and last frames are never candidates; plateau samples fail the
//! strict neighbor comparisons.

/// A raw onset candidate produced by the peak picker, before post-filters
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedPeak {
    /// Frame index of the peak
    pub frame_index: usize,

    /// Raw descriptor value at the peak
    pub descriptor: f32,

    /// Adaptive threshold the peak had to clear
    pub threshold: f32,

    /// Descriptor scaled into [0, 1] over the source's observed range
    pub descriptor_normalized: f32,
}

/// Find descriptor peaks that clear the centered adaptive threshold
///
/// A flat descriptor (observed maximum not above the observed minimum)
/// produces no peaks; this is a valid outcome for silent or perfectly
/// steady input, not an error. Non-finite descriptor samples can never be
/// peaks and contribute nothing to local means.
///
/// # Arguments
///
/// * `descriptor` - Novelty descriptor, one value per frame
/// * `half_window` - Frames on each side of the candidate in the local mean
/// * `sensitivity` - Multiplier applied to the local mean
/// * `refractory_frames` - Accepted peaks must be strictly more than this
///   many frames apart
pub fn pick_peaks(
    descriptor: &[f32],
    half_window: usize,
    sensitivity: f32,
    refractory_frames: usize,
) -> Vec<DetectedPeak> {
    let frames = descriptor.len();
    if frames < 3 {
        return Vec::new();
    }

    let mut d_min = f32::INFINITY;
    let mut d_max = f32::NEG_INFINITY;
    for &d in descriptor {
        if d.is_finite() {
            d_min = d_min.min(d);
            d_max = d_max.max(d);
        }
    }

    if !d_min.is_finite() || !d_max.is_finite() || d_max <= d_min {
        log::debug!(
            "Flat descriptor (min={}, max={}), no onsets",
            d_min,
            d_max
        );
        return Vec::new();
    }
    let range = d_max - d_min;

    let mut peaks = Vec::new();
    let mut last_accepted: Option<usize> = None;

    for i in 1..frames - 1 {
        let d = descriptor[i];
        if !d.is_finite() {
            continue;
        }

        let lo = i.saturating_sub(half_window);
        let hi = (i + half_window + 1).min(frames);
        let mut window_sum = 0.0f32;
        for &v in &descriptor[lo..hi] {
            if v.is_finite() {
                window_sum += v;
            }
        }
        let window_count = (hi - lo - 1).max(1) as f32;
        let local_mean = (window_sum - d) / window_count;
        let threshold = local_mean * sensitivity;
        if !threshold.is_finite() {
            continue;
        }

        // NaN neighbors fail the strict comparisons, so they cannot anchor a peak
        let is_peak = d > threshold && d > descriptor[i - 1] && d > descriptor[i + 1];
        if !is_peak {
            continue;
        }

        if let Some(last) = last_accepted {
            if i - last <= refractory_frames {
                continue;
            }
        }

        last_accepted = Some(i);
        peaks.push(DetectedPeak {
            frame_index: i,
            descriptor: d,
            threshold,
            descriptor_normalized: (d - d_min) / range,
        });
    }

    log::debug!("Picked {} raw peaks from {} frames", peaks.len(), frames);
    peaks
}
