//! Configuration parameters for onset analysis

use crate::error::AnalysisError;

/// Analysis configuration parameters
///
/// All fields have working defaults; most callers only override
/// `sensitivity` or the post-filter switches.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    // Spectral analysis
    /// FFT size in samples; must be a power of two (default: 2048)
    pub fft_size: usize,

    // Peak picking
    /// Adaptive-threshold multiplier (default: 1.2)
    /// A descriptor sample must exceed `local_mean * sensitivity` to count as an onset
    pub sensitivity: f32,

    /// Minimum time after an accepted onset during which no new onset is
    /// accepted, in seconds (default: 0.06)
    pub refractory_seconds: f64,

    /// Frames on each side of the center when computing the adaptive
    /// threshold's local mean (default: 8)
    pub threshold_half_window: usize,

    // Post-filters
    /// Enable the hysteresis (Schmitt trigger) gate (default: false)
    pub apply_hysteresis: bool,

    /// Gate-open threshold on normalized descriptor strength (default: 0.24)
    pub hysteresis_high: f32,

    /// Gate-close threshold on normalized descriptor strength (default: 0.17)
    /// Clamped at use so the open threshold stays at least 0.01 above it
    pub hysteresis_low: f32,

    /// Enable minimum-gap deduplication of close onsets (default: true)
    pub apply_min_hit_gap: bool,

    /// Minimum distance between kept onsets, in frames (default: 2)
    pub min_hit_gap_frames: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            sensitivity: 1.2,
            refractory_seconds: 0.06,
            threshold_half_window: 8,
            apply_hysteresis: false,
            hysteresis_high: 0.24,
            hysteresis_low: 0.17,
            apply_min_hit_gap: true,
            min_hit_gap_frames: 2,
        }
    }
}

impl AnalysisConfig {
    /// Check the configuration for values the pipeline cannot work with
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidConfig` if `fft_size` is not a power
    /// of two, or if `sensitivity` / `refractory_seconds` are not finite.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.fft_size < 2 || !self.fft_size.is_power_of_two() {
            return Err(AnalysisError::InvalidConfig(format!(
                "FFT size must be a power of two >= 2, got {}",
                self.fft_size
            )));
        }

        if !self.sensitivity.is_finite() {
            return Err(AnalysisError::InvalidConfig(format!(
                "Sensitivity must be finite, got {}",
                self.sensitivity
            )));
        }

        if !self.refractory_seconds.is_finite() || self.refractory_seconds < 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "Refractory period must be finite and non-negative, got {}",
                self.refractory_seconds
            )));
        }

        Ok(())
    }
}
