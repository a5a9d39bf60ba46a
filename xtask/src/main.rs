#[cfg(not(test))]
use anyhow::Result;
use clap::{Parser, Subcommand};
#[cfg(not(test))]
use xtask::*;

#[derive(Parser)]
#[command(author, version, about = "Development tasks for pvshift")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Build,
    Test,
    Clippy,
    Fmt,
    /// fmt, clippy and a no_std check
    Analyze,
    Bench,
    /// Run the demo matching the detected features
    Demo,
    /// Pitch-shift a file through pvshift-cli
    Shift {
        /// Path to input audio file
        input: String,
        /// Path to output WAV file
        output: String,
        #[arg(long, allow_negative_numbers = true, default_value_t = 12.0)]
        semitones: f32,
    },
}

#[cfg(not(test))]
fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = detect_config();

    match cli.command {
        Commands::Build => run(build_command(&cfg)),
        Commands::Test => run(test_command(&cfg)),
        Commands::Clippy => run(clippy_command()),
        Commands::Fmt => run(fmt_command()),
        Commands::Analyze => {
            run(fmt_command())?;
            run(clippy_command())?;
            run(no_std_check_command())
        }
        Commands::Bench => run(bench_command(&cfg)),
        Commands::Demo => run(demo_command(&cfg)),
        Commands::Shift {
            input,
            output,
            semitones,
        } => run(shift_command(&input, &output, semitones)),
    }
}
