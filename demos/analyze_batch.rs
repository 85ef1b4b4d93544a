//! Example: Analyze multiple audio files in parallel
//!
//! Usage:
//!   cargo run --release --example analyze_batch -- [--jobs N] [--fps N] <file1> <file2> ...
//!
//! Parallelism is across files; each file analysis is single-threaded.

use onset_dsp::{analyze_file, AnalysisConfig};
use rayon::prelude::*;
use std::env;
use std::time::Instant;

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut fps = 60.0f64;
    let mut jobs: Option<usize> = None;
    let mut paths: Vec<String> = Vec::new();

    while let Some(arg) = args.first().cloned() {
        args.remove(0);
        match arg.as_str() {
            "--jobs" => {
                let value = args
                    .first()
                    .ok_or("--jobs requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
                jobs = Some(std::cmp::max(1, value));
            }
            "--fps" => {
                let value = args.first().ok_or("--fps requires a value")?.parse::<f64>()?;
                args.remove(0);
                fps = value;
            }
            "--help" | "-h" => {
                eprintln!("Usage: analyze_batch [--jobs N] [--fps N] <file1> <file2> ...");
                return Ok(());
            }
            _ => paths.push(arg),
        }
    }

    if paths.is_empty() {
        eprintln!("ERROR: Provide at least one audio file path. Use --help for usage.");
        std::process::exit(2);
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} files, jobs={}", paths.len(), jobs);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .expect("Failed to build rayon thread pool");

    let start = Instant::now();
    let results: Vec<(String, Result<String, String>)> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let outcome = analyze_file(path.as_ref(), fps, AnalysisConfig::default())
                    .map(|source| {
                        format!(
                            "{} onsets, {:.2} BPM, {:.2} s",
                            source.onset_count(),
                            source.average_bpm,
                            source.duration
                        )
                    })
                    .map_err(|e| e.to_string());
                (path.clone(), outcome)
            })
            .collect()
    });

    let mut ok = 0usize;
    for (index, (path, outcome)) in results.iter().enumerate() {
        match outcome {
            Ok(summary) => {
                ok += 1;
                println!("[{}/{}] {}: {}", index + 1, results.len(), path, summary);
            }
            Err(error) => {
                println!("[{}/{}] {}: ERROR: {}", index + 1, results.len(), path, error);
            }
        }
    }

    eprintln!(
        "Done: ok={}/{} wall={:.0}ms",
        ok,
        results.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}
