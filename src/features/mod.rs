//! Feature extraction modules
//!
//! The per-frame measurements and onset-detection stages of the pipeline:
//! - Windowed spectral analysis (Hann + FFT + log compression)
//! - High-frequency-weighted spectral-flux novelty descriptor
//! - RMS / dB loudness measurement
//! - Centered adaptive-threshold peak picking
//! - Post-filters (hysteresis gate, minimum gap)
//! - Tempo estimation from inter-onset intervals

pub mod loudness;
pub mod novelty;
pub mod peak_picking;
pub mod postfilter;
pub mod spectral;
pub mod tempo;
