//! Basic usage example for pvshift
//!
//! Streams a tone through a `PitchShifter` one hop at a time, the way an
//! audio callback would, and reports the level of the shifted signal.

use pvshift::{hop_out_for, semitones_to_factor, PitchShifter, HOP_SIZE, LATENCY};

fn main() {
    println!("=== pvshift Basic Usage Example ===\n");

    let sample_rate = 44_100.0f32;
    let tone_hz = 440.0f32;
    let seconds = 1.0f32;
    let total = (sample_rate * seconds) as usize / HOP_SIZE * HOP_SIZE;
    let signal: Vec<f32> = (0..total)
        .map(|n| 0.5 * (2.0 * std::f32::consts::PI * tone_hz * n as f32 / sample_rate).sin())
        .collect();

    for semitones in [-12.0f32, -5.0, 0.0, 7.0, 12.0] {
        let factor = semitones_to_factor(semitones);
        let mut shifter = PitchShifter::new();
        let mut output = Vec::with_capacity(total);
        let mut block = [0.0f32; HOP_SIZE];
        for hop in signal.chunks_exact(HOP_SIZE) {
            let hop: &[f32; HOP_SIZE] = hop.try_into().unwrap();
            shifter.process(hop, &mut block, factor);
            output.extend_from_slice(&block);
        }

        let steady = &output[2 * LATENCY..];
        let rms = (steady.iter().map(|v| v * v).sum::<f32>() / steady.len() as f32).sqrt();
        println!(
            "{:>6.1} st  factor {:.4}  hop_out {:>3}  steady RMS {:.4}",
            semitones,
            factor,
            hop_out_for(factor),
            rms
        );
    }

    println!("\nLatency at unity factor: {} samples", LATENCY);
}
