//! Example: Concatenate audio tracks into a single WAV file
//!
//! Usage:
//!   cargo run --release --example combine_tracks -- <file1> <file2> ...

use onset_dsp::io::combine::combine_tracks;
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let inputs: Vec<PathBuf> = env::args().skip(1).map(PathBuf::from).collect();
    if inputs.is_empty() {
        eprintln!("Usage: combine_tracks <file1> <file2> ...");
        std::process::exit(2);
    }

    let combined = combine_tracks(&inputs, 60.0)?;
    println!("Combined {} tracks into {}", inputs.len(), combined.path.display());

    Ok(())
}
