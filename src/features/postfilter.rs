//! Optional onset post-filters
//!
//! Two filters applied to the picked peaks, in this order:
//! 1. Hysteresis (Schmitt trigger) gate over normalized descriptor strength
//! 2. Minimum-gap deduplication of onsets closer than a frame distance
//!
//! Both filters are idempotent: running either on its own output changes
//! nothing.

use super::peak_picking::DetectedPeak;

/// Gate a peak sequence with separate open/close thresholds
///
/// The gate opens when a peak's normalized strength reaches `high` and
/// closes (dropping that peak) when it falls below `low`. While closed,
/// peaks below `high` are dropped; while open, peaks at or above `low` are
/// kept. `high` is clamped to stay at least 0.01 above `low`.
pub fn apply_hysteresis(peaks: &[DetectedPeak], high: f32, low: f32) -> Vec<DetectedPeak> {
    let high = high.max(low + 0.01);

    let mut kept = Vec::with_capacity(peaks.len());
    let mut gate_open = false;

    for peak in peaks {
        let strength = peak.descriptor_normalized;
        if gate_open {
            if strength < low {
                gate_open = false;
            } else {
                kept.push(peak.clone());
            }
        } else if strength >= high {
            gate_open = true;
            kept.push(peak.clone());
        }
    }

    log::debug!(
        "Hysteresis gate kept {} of {} peaks (high={}, low={})",
        kept.len(),
        peaks.len(),
        high,
        low
    );
    kept
}

/// Collapse peaks closer than `min_gap_frames`, keeping the stronger one
///
/// Walks the peaks in frame order; a peak within the gap of the last kept
/// peak replaces it when stronger and is dropped otherwise.
pub fn apply_min_gap(peaks: &[DetectedPeak], min_gap_frames: usize) -> Vec<DetectedPeak> {
    let mut kept: Vec<DetectedPeak> = Vec::with_capacity(peaks.len());

    for peak in peaks {
        if let Some(last) = kept.last_mut() {
            if peak.frame_index - last.frame_index < min_gap_frames {
                if peak.descriptor_normalized > last.descriptor_normalized {
                    *last = peak.clone();
                }
                continue;
            }
        }
        kept.push(peak.clone());
    }

    log::debug!(
        "Minimum-gap filter kept {} of {} peaks (gap={})",
        kept.len(),
        peaks.len(),
        min_gap_frames
    );
    kept
}
