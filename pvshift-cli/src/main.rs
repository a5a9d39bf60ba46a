use clap::{ArgGroup, Parser};
use pvshift::{Envelope, RenderCache};
use pvshift_cli::{parse_envelope, shift_file};
use std::error::Error;
use std::path::PathBuf;

/// Pitch-shift an audio file with the pvshift phase vocoder.
#[derive(Parser)]
#[command(group(ArgGroup::new("shift").required(true).args(["semitones", "envelope"])))]
struct Args {
    /// Input audio (WAV, FLAC or MP3)
    input: PathBuf,

    /// Output WAV path (mono, 32-bit float)
    output: PathBuf,

    /// Constant shift in semitones
    #[arg(long, allow_negative_numbers = true)]
    semitones: Option<f32>,

    /// Bend envelope as FRAME:SEMITONES pairs, e.g. "0:0,344:12"
    #[arg(long)]
    envelope: Option<String>,

    /// Log every step
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::builder()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    // clap guarantees exactly one of the two.
    let envelope = match &args.envelope {
        Some(text) => parse_envelope(text)?,
        None => Envelope::constant(args.semitones.unwrap_or(0.0)),
    };

    let mut cache = RenderCache::from_env();
    let report = shift_file(&args.input, &args.output, &envelope, &mut cache)?;
    println!(
        "{} -> {}: {} samples at {} Hz{}",
        args.input.display(),
        args.output.display(),
        report.samples,
        report.sample_rate,
        if report.bypassed { " (bypass)" } else { "" }
    );
    Ok(())
}
