//! Example: Analyze a single audio file
//!
//! Usage:
//!   cargo run --release --example analyze_file -- [--fps N] [--json] <file>

use onset_dsp::{analyze_file, AnalysisConfig};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut fps = 60.0f64;
    let mut json = false;
    let mut path: Option<String> = None;

    while let Some(arg) = args.first().cloned() {
        args.remove(0);
        match arg.as_str() {
            "--json" => json = true,
            "--fps" => {
                let value = args.first().ok_or("--fps requires a value")?.parse::<f64>()?;
                args.remove(0);
                fps = value;
            }
            "--help" | "-h" => {
                eprintln!("Usage: analyze_file [--fps N] [--json] <file>");
                return Ok(());
            }
            _ => path = Some(arg),
        }
    }

    let path = path.ok_or("Provide an audio file path. Use --help for usage.")?;

    let source = analyze_file(path.as_ref(), fps, AnalysisConfig::default())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&source)?);
        return Ok(());
    }

    println!("Analysis of {}:", path);
    println!("  Duration:       {:.2} s ({} channels at {} Hz)", source.duration, source.channels, source.sample_rate);
    println!("  Frames:         {} at {} fps", source.frames.len(), source.fps);
    println!("  Onsets:         {}", source.onset_count());
    println!("  Tempo:          {:.2} BPM", source.average_bpm);
    println!("  Average RMS:    {:.4}", source.average_rms);
    println!("  Loudness:       avg {:.1} dB, max {:.1} dB", source.average_loudness_db, source.max_loudness_db);

    for onset in source.onsets().take(20) {
        println!(
            "    onset @ {:>7.3} s  frame {:>5}  strength {:.3}",
            onset.time, onset.frame_index, onset.descriptor_normalized
        );
    }
    if source.onset_count() > 20 {
        println!("    ... {} more", source.onset_count() - 20);
    }

    Ok(())
}
