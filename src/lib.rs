//! # pvshift - real-time phase-vocoder pitch shifting for Rust
//!
//! A fixed-latency pitch shifter built for audio callbacks: every buffer is
//! sized once when an instance is created, and a processing call never
//! allocates, blocks or fails.
//!
//! ## Features
//!
//! - **Hand-rolled radix-2 FFT** with a packed real-input transform
//! - **Phase-vocoder analysis/resynthesis** with per-bin phase memory
//! - **Variable synthesis hop** resampled back to a fixed block size, so the
//!   pitch changes while playback speed does not
//! - **Offline rendering** driven by semitone bend envelopes, with a
//!   content-addressed render cache
//! - **Parallel batch rendering** (optional, `parallel` feature)
//!
//! ## Cargo Features
//!
//! - `std` (default): shared window table, `std::error::Error` impls and
//!   environment configuration
//! - `parallel`: batch rendering with Rayon
//! - `verbose-logging`: `log` records on cold paths (instance creation,
//!   offline renders, cache activity)
//!
//! ## Quick Start
//!
//! ```
//! use pvshift::{PitchShifter, HOP_SIZE};
//!
//! let mut shifter = PitchShifter::new();
//! let input = [0.0f32; HOP_SIZE];
//! let mut output = [0.0f32; HOP_SIZE];
//! // One octave up.
//! shifter.process(&input, &mut output, 2.0);
//! ```
//!
//! ## Fixed configuration
//!
//! The engine is built around a single frame size ([`FRAME_SIZE`]) and input
//! hop ([`HOP_SIZE`]), giving 8x analysis overlap. The synthesis hop is
//! `round(factor * HOP_SIZE)` and must stay inside
//! [`MIN_HOP_OUT`]`..=`[`MAX_HOP_OUT`]; [`PitchShifter::try_process`] checks
//! this, [`PitchShifter::process`] leaves it to the caller.
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

#![no_std]
extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

/// Radix-2 complex FFT and the packed real FFT built on it.
pub mod fft;

/// Hann window table, windowing and synthesis energy scaling.
pub mod window;

/// Spectral analysis (amplitude / instantaneous frequency) and resynthesis.
pub mod vocoder;

/// Fixed-capacity sliding sample buffers.
pub mod buffer;

/// Linear hop resampler that maps the synthesis hop onto the output block.
pub mod resample;

/// Streaming pitch shifter instance.
pub mod shifter;

/// Semitone bend envelopes.
pub mod envelope;

/// Offline rendering, render cache and batch rendering.
pub mod render;

/// Number of samples transformed per FFT frame.
pub const FRAME_SIZE: usize = 1024;

/// Number of new input samples consumed (and output samples produced) per call.
pub const HOP_SIZE: usize = 128;

/// Number of spectral bins, DC through Nyquist inclusive.
pub const BINS: usize = FRAME_SIZE / 2 + 1;

/// Smallest synthesis hop the overlap arithmetic supports.
pub const MIN_HOP_OUT: usize = 1;

/// Largest synthesis hop the overlap arithmetic supports.
pub const MAX_HOP_OUT: usize = FRAME_SIZE - 1;

/// Input-to-output delay in samples at a pitch factor of 1.0.
pub const LATENCY: usize = FRAME_SIZE - HOP_SIZE;

pub use envelope::{semitones_to_factor, BendPoint, Envelope, EnvelopeError};
pub use fft::{Direction, FftError};
pub use render::{frame_count, OfflineRenderer, RenderCache};
#[cfg(feature = "parallel")]
pub use render::render_batch;
pub use shifter::{checked_hop_out, hop_out_for, PitchShifter, ShiftError};
pub use vocoder::Partial;
pub use window::WindowTable;
