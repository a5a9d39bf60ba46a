//! Streaming pitch shifter.
//!
//! A [`PitchShifter`] owns every buffer one audio stream needs. Each call to
//! [`PitchShifter::process`] consumes [`HOP_SIZE`] input samples and produces
//! [`HOP_SIZE`] output samples:
//!
//! 1. slide the new hop into the input window,
//! 2. window, forward FFT, analyze,
//! 3. resynthesize at the synthesis hop, inverse FFT,
//! 4. window, scale and overlap-add into the accumulator,
//! 5. resample the first `hop_out` accumulated samples into the output block,
//! 6. advance the accumulator by `hop_out`.
//!
//! Nothing on this path allocates, blocks or logs.

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

use crate::buffer::SlidingBuffer;
use crate::fft::{real_fft_unchecked, Direction};
use crate::resample::interpolate_fit;
use crate::vocoder::{analyze, synthesize, PackedSpectrum, Partial};
use crate::window::{synthesis_scale, WindowTable};
use crate::{BINS, FRAME_SIZE, HOP_SIZE, MAX_HOP_OUT, MIN_HOP_OUT};

/// Errors reported by the validating entry points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShiftError {
    /// The pitch factor was NaN or infinite.
    NonFiniteFactor,
    /// The factor maps to a synthesis hop the overlap buffers cannot hold.
    HopOutOfRange {
        hop_out: usize,
        min: usize,
        max: usize,
    },
}

impl fmt::Display for ShiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftError::NonFiniteFactor => write!(f, "pitch factor must be finite"),
            ShiftError::HopOutOfRange { hop_out, min, max } => write!(
                f,
                "synthesis hop {} is outside the supported range {}..={}",
                hop_out, min, max
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ShiftError {}

/// Synthesis hop for a pitch factor: `round(factor * HOP_SIZE)`.
///
/// Negative and NaN factors map to 0.
#[inline]
pub fn hop_out_for(factor: f32) -> usize {
    libm::roundf(factor * HOP_SIZE as f32) as usize
}

/// Validate `factor` and return its synthesis hop.
pub fn checked_hop_out(factor: f32) -> Result<usize, ShiftError> {
    if !factor.is_finite() {
        return Err(ShiftError::NonFiniteFactor);
    }
    let hop_out = hop_out_for(factor);
    if !(MIN_HOP_OUT..=MAX_HOP_OUT).contains(&hop_out) {
        return Err(ShiftError::HopOutOfRange {
            hop_out,
            min: MIN_HOP_OUT,
            max: MAX_HOP_OUT,
        });
    }
    Ok(hop_out)
}

/// Per-stream phase-vocoder state.
///
/// Instances are independent; the only thing they share is the read-only
/// [`WindowTable`]. Hops must be submitted in stream order.
#[derive(Debug, Clone)]
pub struct PitchShifter {
    window: Arc<WindowTable>,
    input: SlidingBuffer<FRAME_SIZE>,
    overlap: SlidingBuffer<FRAME_SIZE>,
    last_phase: Box<[f32; BINS]>,
    accum_phase: Box<[f32; BINS]>,
    // Scratch reused every call: packed spectrum / time-domain frame.
    frame: Box<[f32; FRAME_SIZE]>,
    partials: Box<[Partial; BINS]>,
}

impl PitchShifter {
    /// Create an instance backed by the process-wide window table.
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        Self::with_window(WindowTable::shared())
    }

    /// Create an instance using `window` as its Hann table.
    pub fn with_window(window: Arc<WindowTable>) -> Self {
        #[cfg(feature = "verbose-logging")]
        log::debug!(
            "creating pitch shifter (frame {}, hop {}, {} bins)",
            FRAME_SIZE,
            HOP_SIZE,
            BINS
        );
        Self {
            window,
            input: SlidingBuffer::new(),
            overlap: SlidingBuffer::new(),
            last_phase: Box::new([0.0; BINS]),
            accum_phase: Box::new([0.0; BINS]),
            frame: Box::new([0.0; FRAME_SIZE]),
            partials: Box::new([Partial::default(); BINS]),
        }
    }

    /// The window table this instance reads.
    pub fn window(&self) -> &Arc<WindowTable> {
        &self.window
    }

    /// Return to the freshly created state.
    pub fn reset(&mut self) {
        self.input.clear();
        self.overlap.clear();
        self.last_phase.fill(0.0);
        self.accum_phase.fill(0.0);
        self.frame.fill(0.0);
        self.partials.fill(Partial::default());
    }

    /// Shift one hop of audio by `factor` (2.0 is an octave up).
    ///
    /// `factor` must give a synthesis hop ([`hop_out_for`]) inside
    /// [`MIN_HOP_OUT`]`..=`[`MAX_HOP_OUT`]. This is not checked; a hop above
    /// the range panics on a bounds check, and a zero hop stalls the
    /// accumulator, repeating its first sample across the block.
    /// Use [`PitchShifter::try_process`] for untrusted factors.
    pub fn process(&mut self, input: &[f32; HOP_SIZE], output: &mut [f32; HOP_SIZE], factor: f32) {
        let hop_out = hop_out_for(factor);
        self.input.push(input);
        self.analyze_frame();
        self.resynthesize_frame(hop_out);
        self.overlap_add(hop_out);
        interpolate_fit(self.overlap.as_slice(), hop_out, output);
        self.overlap.advance(hop_out);
    }

    /// [`PitchShifter::process`] writing the output over the input block.
    pub fn process_in_place(&mut self, block: &mut [f32; HOP_SIZE], factor: f32) {
        let input = *block;
        self.process(&input, block, factor);
    }

    /// Validate `factor`, then [`PitchShifter::process`].
    ///
    /// On error the instance is left untouched and `output` is not written.
    pub fn try_process(
        &mut self,
        input: &[f32; HOP_SIZE],
        output: &mut [f32; HOP_SIZE],
        factor: f32,
    ) -> Result<(), ShiftError> {
        checked_hop_out(factor)?;
        self.process(input, output, factor);
        Ok(())
    }

    fn analyze_frame(&mut self) {
        self.window.apply(self.input.as_array(), &mut self.frame, 1.0);
        real_fft_unchecked(&mut self.frame[..], Direction::Forward);
        let spectrum = PackedSpectrum::new(&mut self.frame);
        analyze(&spectrum, HOP_SIZE, &mut self.last_phase, &mut self.partials);
    }

    fn resynthesize_frame(&mut self, hop_out: usize) {
        let mut spectrum = PackedSpectrum::new(&mut self.frame);
        synthesize(&self.partials, hop_out, &mut self.accum_phase, &mut spectrum);
        real_fft_unchecked(&mut self.frame[..], Direction::Inverse);
    }

    fn overlap_add(&mut self, hop_out: usize) {
        self.window.apply_in_place(&mut self.frame, synthesis_scale(hop_out));
        self.overlap.accumulate(&self.frame[..]);
    }
}

#[cfg(feature = "std")]
impl Default for PitchShifter {
    fn default() -> Self {
        Self::new()
    }
}
