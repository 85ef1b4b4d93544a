//! Integration tests for the onset analysis pipeline

use onset_dsp::{analyze_audio, AnalysisConfig, AudioSource, PcmInput};

/// Generate a signal with short decaying clicks at the given times
///
/// Clicks are 2 ms exponential-decay bursts rather than single-sample
/// impulses, so their energy survives window-edge weighting the way real
/// percussive hits do.
fn click_train(duration_seconds: f64, sample_rate: u32, click_times: &[f64]) -> Vec<f32> {
    let total = (duration_seconds * sample_rate as f64).round() as usize;
    let mut samples = vec![0.0f32; total];
    let click_len = 96;

    for &t in click_times {
        let start = (t * sample_rate as f64).round() as usize;
        for i in 0..click_len {
            if start + i >= total {
                break;
            }
            let decay = (-(i as f32) * 5.0 / click_len as f32).exp();
            samples[start + i] += 0.8 * decay;
        }
    }

    samples
}

fn analyze_mono(samples: &[f32], sample_rate: u32, fps: f64) -> AudioSource {
    let pcm = PcmInput::Interleaved {
        samples,
        channels: 1,
    };
    analyze_audio(&pcm, sample_rate, fps, AnalysisConfig::default()).unwrap()
}

fn onset_frames(source: &AudioSource) -> Vec<usize> {
    source.onsets().map(|o| o.frame_index).collect()
}

#[test]
fn test_silence_produces_frames_without_onsets() {
    let samples = vec![0.0f32; 96_000]; // 2 s at 48 kHz
    let source = analyze_mono(&samples, 48_000, 60.0);

    assert_eq!(source.frames.len(), 120);
    assert_eq!(source.onset_count(), 0);
    assert_eq!(source.average_bpm, 0.0);
    assert_eq!(source.average_rms, 0.0);
    assert_eq!(source.max_loudness_db, -140.0);

    for frame in &source.frames {
        assert_eq!(frame.rms, 0.0);
        assert_eq!(frame.loudness_db, -140.0);
        assert_eq!(frame.loudness_normalized, 0.0);
        assert!(!frame.has_onset());
    }
}

#[test]
fn test_steady_signal_produces_no_onsets() {
    // A DC signal has spectral energy but no rising flux after the first
    // frame, which is excluded from peak picking
    let samples = vec![0.25f32; 48_000];
    let source = analyze_mono(&samples, 48_000, 60.0);

    assert_eq!(source.onset_count(), 0);
    assert_eq!(source.average_bpm, 0.0);
    assert!(source.frames.iter().all(|f| f.rms > 0.0));
}

#[test]
fn test_single_click_yields_one_onset() {
    let samples = click_train(2.0, 48_000, &[0.5]);
    let source = analyze_mono(&samples, 48_000, 60.0);

    assert_eq!(source.onset_count(), 1);
    let onset = source.onsets().next().unwrap();

    // Click at 0.5 s lands at frame round(0.5 * 60) = 30; window-edge
    // weighting may resolve it one or two frames early
    let expected = 30i64;
    assert!(
        (onset.frame_index as i64 - expected).abs() <= 2,
        "Onset at frame {}, expected near {}",
        onset.frame_index,
        expected
    );

    // The only spectral event is the source's descriptor maximum
    assert!((onset.descriptor_normalized - 1.0).abs() < 1e-6);
    assert!(onset.descriptor > onset.threshold);

    // A single onset has no successor and no usable tempo
    assert_eq!(onset.next_onset_frame, 0);
    assert_eq!(onset.distance_to_next_onset, 0);
    assert_eq!(source.average_bpm, 0.0);
}

#[test]
fn test_click_train_at_120_bpm() {
    // Clicks every 0.5 s, offset so each burst sits clear of frame zero
    let times: Vec<f64> = (0..8).map(|k| 0.25 + 0.5 * k as f64).collect();
    let samples = click_train(4.25, 48_000, &times);
    let source = analyze_mono(&samples, 48_000, 100.0);

    let frames = onset_frames(&source);
    assert_eq!(frames.len(), 8, "Expected 8 onsets, got {:?}", frames);

    // Click spacing is an exact multiple of the hop, so detected onsets
    // keep the 50-frame period even if the whole train is shifted
    for pair in frames.windows(2) {
        assert_eq!(pair[1] - pair[0], 50);
    }

    assert!(
        (source.average_bpm - 120.0).abs() < 0.01,
        "Expected 120 BPM, got {}",
        source.average_bpm
    );

    // Linking: every onset but the last points at its successor
    let onsets: Vec<_> = source.onsets().cloned().collect();
    for (k, onset) in onsets.iter().enumerate() {
        if k + 1 < onsets.len() {
            assert_eq!(onset.distance_to_next_onset, 50);
            assert_eq!(onset.next_onset_frame, onsets[k + 1].frame_index);
        } else {
            assert_eq!(onset.distance_to_next_onset, 0);
            assert_eq!(onset.next_onset_frame, 0);
        }
    }

    // Tempo is stamped onto every frame
    assert!(source.frames.iter().all(|f| f.bpm == source.average_bpm));
}

#[test]
fn test_fast_train_octave_normalizes_into_range() {
    // Clicks every 0.3 s: raw 200 BPM, must fold into [60, 180]
    let times: Vec<f64> = (0..10).map(|k| 0.25 + 0.3 * k as f64).collect();
    let samples = click_train(3.4, 48_000, &times);
    let source = analyze_mono(&samples, 48_000, 100.0);

    assert_eq!(source.onset_count(), 10);
    assert!(
        (source.average_bpm - 100.0).abs() < 0.01,
        "Expected 100 BPM after octave fold, got {}",
        source.average_bpm
    );
    assert!((60.0..=180.0).contains(&source.average_bpm));
}

#[test]
fn test_adjacent_clicks_collapse_to_one_onset() {
    // Two clicks one analysis frame apart (hop = 800 at 60 fps / 48 kHz)
    let samples = click_train(1.0, 48_000, &[0.25, 0.25 + 800.0 / 48_000.0]);
    let source = analyze_mono(&samples, 48_000, 60.0);

    assert_eq!(source.onset_count(), 1);
}

#[test]
fn test_stereo_mixdown_matches_mono() {
    let times: Vec<f64> = (0..4).map(|k| 0.25 + 0.5 * k as f64).collect();
    let mono_samples = click_train(2.25, 48_000, &times);

    let mono_source = analyze_mono(&mono_samples, 48_000, 100.0);

    let planar = [mono_samples.clone(), mono_samples.clone()];
    let stereo_source = analyze_audio(
        &PcmInput::Planar(&planar),
        48_000,
        100.0,
        AnalysisConfig::default(),
    )
    .unwrap();

    // (x + x) / 2 is exact, so the whole analysis matches bit for bit
    assert_eq!(stereo_source.channels, 2);
    assert_eq!(mono_source.frames, stereo_source.frames);
    assert_eq!(mono_source.average_bpm, stereo_source.average_bpm);
    assert_eq!(mono_source.average_rms, stereo_source.average_rms);
    assert_eq!(mono_source.max_loudness_db, stereo_source.max_loudness_db);
}

#[test]
fn test_result_invariants_hold() {
    let times: Vec<f64> = (0..8).map(|k| 0.25 + 0.5 * k as f64).collect();
    let samples = click_train(4.25, 48_000, &times);
    let fps = 100.0;
    let source = analyze_mono(&samples, 48_000, fps);

    // Frame count: ceil(N / hop) with hop = round(sr / fps)
    let hop = (48_000f64 / fps).round() as usize;
    assert_eq!(source.frames.len(), samples.len().div_ceil(hop));

    // Contiguous indices, strictly increasing times with constant step
    let step = hop as f64 / 48_000.0;
    for (i, frame) in source.frames.iter().enumerate() {
        assert_eq!(frame.index, i);
        assert!((frame.time - i as f64 * step).abs() < 1e-9);
    }

    // Onsets strictly ordered, outside the refractory span, and consistent
    // with their carrying frames
    let refractory = (0.06 * fps).round() as usize;
    let frames = onset_frames(&source);
    for pair in frames.windows(2) {
        assert!(pair[1] - pair[0] > refractory);
        assert!(pair[1] - pair[0] >= 2); // default min_hit_gap_frames
    }
    for frame in &source.frames {
        assert!(frame.onsets.len() <= 1);
        if let Some(onset) = &frame.onset {
            assert_eq!(onset.frame_index, frame.index);
            assert_eq!(frame.onsets.len(), 1);
            assert_eq!(&frame.onsets[0], onset);
            assert!((onset.time - frame.time).abs() < 1e-12);
        }
    }

    // Normalized fields in [0, 1], dB fields floored at -140
    for frame in &source.frames {
        assert!((0.0..=1.0).contains(&frame.rms_normalized));
        assert!((0.0..=1.0).contains(&frame.loudness_normalized));
        assert!((0.0..=1.0).contains(&frame.relative_loudness_normalized));
        assert!(frame.loudness_db >= -140.0);
    }
    for onset in source.onsets() {
        assert!((0.0..=1.0).contains(&onset.descriptor_normalized));
        assert!((0.0..=1.0).contains(&onset.loudness_normalized));
        assert!(onset.loudness_db >= -140.0);
    }

    // Tempo is zero or octave-normalized into range
    assert!(
        source.average_bpm == 0.0 || (60.0..=180.0).contains(&source.average_bpm)
    );

    // Summary aggregates reflect the clicks
    assert!(source.average_rms > 0.0);
    assert!(source.max_loudness_db > -140.0);
    assert!(source.max_loudness_db >= source.average_loudness_db);
    assert!(source.average_onset_loudness_db >= -140.0);
}

#[test]
fn test_empty_input_produces_empty_source() {
    let source = analyze_mono(&[], 48_000, 60.0);

    assert!(source.frames.is_empty());
    assert_eq!(source.onset_count(), 0);
    assert_eq!(source.average_rms, 0.0);
    assert_eq!(source.average_loudness_db, 0.0);
    assert_eq!(source.average_onset_loudness_db, 0.0);
    assert_eq!(source.max_loudness_db, -140.0);
    assert_eq!(source.average_bpm, 0.0);
}

#[test]
fn test_input_shorter_than_fft_yields_one_frame() {
    // 1000 samples at 40 fps / 44.1 kHz: hop = 1103 > input length
    let samples = vec![0.3f32; 1000];
    let source = analyze_mono(&samples, 44_100, 40.0);

    assert_eq!(source.frames.len(), 1);
    assert_eq!(source.onset_count(), 0);
}

#[test]
fn test_invalid_inputs_are_rejected() {
    let samples = vec![0.0f32; 1000];
    let pcm = PcmInput::Interleaved {
        samples: &samples,
        channels: 1,
    };

    // Non-positive analysis rate
    assert!(analyze_audio(&pcm, 48_000, 0.0, AnalysisConfig::default()).is_err());
    assert!(analyze_audio(&pcm, 48_000, -10.0, AnalysisConfig::default()).is_err());

    // FFT size not a power of two
    let config = AnalysisConfig {
        fft_size: 1500,
        ..AnalysisConfig::default()
    };
    assert!(analyze_audio(&pcm, 48_000, 60.0, config).is_err());

    // Zero channels
    let no_channels = PcmInput::Planar(&[]);
    assert!(analyze_audio(&no_channels, 48_000, 60.0, AnalysisConfig::default()).is_err());
}

#[test]
fn test_hysteresis_keeps_uniform_train() {
    // Uniform full-strength clicks all clear the open threshold, so the
    // gate stays open across the train
    let times: Vec<f64> = (0..6).map(|k| 0.25 + 0.5 * k as f64).collect();
    let samples = click_train(3.25, 48_000, &times);
    let pcm = PcmInput::Interleaved {
        samples: &samples,
        channels: 1,
    };

    let config = AnalysisConfig {
        apply_hysteresis: true,
        ..AnalysisConfig::default()
    };
    let source = analyze_audio(&pcm, 48_000, 100.0, config).unwrap();
    assert_eq!(source.onset_count(), 6);
}

#[test]
fn test_source_serializes_and_round_trips() {
    let samples = click_train(1.0, 48_000, &[0.5]);
    let source = analyze_mono(&samples, 48_000, 60.0);

    let json = serde_json::to_string(&source).unwrap();
    let restored: AudioSource = serde_json::from_str(&json).unwrap();
    assert_eq!(source, restored);
}

