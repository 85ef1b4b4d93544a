//! Audio decoding using Symphonia
//!
//! Decodes any container/codec Symphonia's default registry recognizes into
//! interleaved `f32` PCM. Corrupt packets are skipped; unrecoverable errors
//! surface as [`AnalysisError::DecodeFailed`].

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::AnalysisError;
use crate::preprocessing::channel_mixer::PcmInput;

/// Decoded PCM plus the stream parameters the pipeline needs
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Frame-interleaved samples
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of interleaved channels
    pub channels: usize,
}

impl DecodedAudio {
    /// Number of per-channel sample frames
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frame_count() as f64 / self.sample_rate as f64
        }
    }

    /// View the decoded samples as pipeline input
    pub fn as_pcm(&self) -> PcmInput<'_> {
        PcmInput::Interleaved {
            samples: &self.samples,
            channels: self.channels,
        }
    }
}

/// Decode an audio file to interleaved `f32` PCM
///
/// # Errors
///
/// Returns `AnalysisError::DecodeFailed` if the file cannot be opened,
/// probed, or decoded, or if it contains no audio track.
pub fn decode_file(path: &Path) -> Result<DecodedAudio, AnalysisError> {
    let file = File::open(path).map_err(|e| {
        AnalysisError::DecodeFailed(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| {
            AnalysisError::DecodeFailed(format!("Failed to probe {}: {}", path.display(), e))
        })?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            AnalysisError::DecodeFailed(format!("No audio track in {}", path.display()))
        })?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.ok_or_else(|| {
        AnalysisError::DecodeFailed(format!("Unknown sample rate in {}", path.display()))
    })?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| {
            AnalysisError::DecodeFailed(format!(
                "Failed to create decoder for {}: {}",
                path.display(),
                e
            ))
        })?;

    let mut samples: Vec<f32> = Vec::new();
    let mut channels = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(AnalysisError::DecodeFailed(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("Skipping corrupt packet in {}: {}", path.display(), e);
                continue;
            }
            Err(e) => {
                return Err(AnalysisError::DecodeFailed(format!(
                    "Failed to decode {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let spec = *decoded.spec();
        channels = spec.channels.count();

        let mut buffer = SampleBuffer::<f32>::new(decoded.frames() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buffer.samples());
    }

    if channels == 0 {
        return Err(AnalysisError::DecodeFailed(format!(
            "No decodable audio in {}",
            path.display()
        )));
    }

    log::debug!(
        "Decoded {}: {} frames, {} channels at {} Hz",
        path.display(),
        samples.len() / channels,
        channels,
        sample_rate
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}
