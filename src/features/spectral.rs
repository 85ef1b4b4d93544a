//! Windowed spectral analysis
//!
//! Converts one analysis frame at a time into a log-compressed magnitude
//! spectrum:
//! 1. Multiply the frame by a Hann window (zero-padding short frames)
//! 2. Forward FFT
//! 3. Squared magnitude per bin: `re^2 + im^2`
//! 4. Log compression: `ln(1 + magnitude)`
//!
//! The analyzer owns its FFT plan and workspace buffers, so repeated calls
//! across the frames of one source allocate nothing.

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Reusable windowed-FFT analyzer producing log-compressed magnitudes
///
/// The magnitude spectrum has exactly `fft_size / 2` bins; the bin layout
/// is shared with [`NoveltyFunction`](crate::features::novelty::NoveltyFunction),
/// whose high-frequency ramp spans the same bin count.
pub struct SpectralAnalyzer {
    fft_size: usize,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    log_mag: Vec<f32>,
}

impl SpectralAnalyzer {
    /// Create an analyzer for the given FFT size (must be a power of two)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        // Hann window in the denormalized full form
        let window: Vec<f32> = (0..fft_size)
            .map(|i| {
                let x = 2.0 * std::f32::consts::PI * i as f32 / fft_size as f32;
                0.5 * (1.0 - x.cos())
            })
            .collect();

        Self {
            fft_size,
            fft,
            window,
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            log_mag: vec![0.0; fft_size / 2],
        }
    }

    /// Number of magnitude bins produced per frame (`fft_size / 2`)
    pub fn bins(&self) -> usize {
        self.fft_size / 2
    }

    /// Window, transform, and log-compress one analysis frame
    ///
    /// Frames shorter than the FFT size are zero-padded; anything beyond
    /// `fft_size` samples is ignored. The returned slice is valid until the
    /// next call and holds `ln(1 + |X[k]|^2)` per bin, which is zero for
    /// silence and finite for any finite input.
    pub fn log_magnitudes(&mut self, frame: &[f32]) -> &[f32] {
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = frame.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.buffer);

        for (bin, out) in self.log_mag.iter_mut().enumerate() {
            let c = self.buffer[bin];
            let power = c.re * c.re + c.im * c.im;
            *out = power.ln_1p();
        }

        &self.log_mag
    }
}
