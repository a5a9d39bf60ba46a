//! Phase-vocoder analysis and resynthesis.
//!
//! One spectral frame lives in two layouts during a processing call. The
//! transform produces a [`PackedSpectrum`] (the packed real-FFT layout of
//! [`crate::fft::real_fft`]); [`analyze`] turns it into one [`Partial`] per
//! bin, and [`synthesize`] turns the partials back into a packed spectrum
//! for the inverse transform.

use core::f32::consts::PI;

use crate::{BINS, FRAME_SIZE};

const TWO_PI: f32 = 2.0 * PI;

/// Magnitudes (scaled by the frame size) below this are treated as silence,
/// and imaginary parts below it as exactly zero.
pub const ZERO_AMP: f32 = 0.000_001;

/// Amplitude and instantaneous angular frequency (radians per sample) of one
/// bin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Partial {
    pub amplitude: f32,
    pub frequency: f32,
}

/// Centre angular frequency of bin `k`, in radians per sample.
#[inline]
pub fn bin_frequency(k: usize) -> f32 {
    TWO_PI * k as f32 / FRAME_SIZE as f32
}

/// Wrap a phase difference into a single `2π` interval around zero.
///
/// A result that lands exactly on `+π` is reported as `-π`.
#[inline]
pub fn wrap_phase(delta: f32) -> f32 {
    if delta > 0.0 {
        libm::fmodf(delta + PI, TWO_PI) - PI
    } else {
        let wrapped = libm::fmodf(delta - PI, TWO_PI) + PI;
        if wrapped == PI {
            -PI
        } else {
            wrapped
        }
    }
}

/// Packed real-spectrum view over one frame buffer.
///
/// Bin 0 (DC) lives in slot 0 and bin `FRAME_SIZE / 2` (Nyquist) in slot 1;
/// both are real-only. Every other bin `k` occupies slots `2k` and `2k + 1`.
pub struct PackedSpectrum<'a> {
    data: &'a mut [f32; FRAME_SIZE],
}

impl<'a> PackedSpectrum<'a> {
    #[inline]
    pub fn new(data: &'a mut [f32; FRAME_SIZE]) -> Self {
        Self { data }
    }

    /// `(re, im)` of bin `k`; the imaginary part of DC and Nyquist is zero.
    #[inline]
    pub fn bin(&self, k: usize) -> (f32, f32) {
        match k {
            0 => (self.data[0], 0.0),
            k if k == BINS - 1 => (self.data[1], 0.0),
            k => (self.data[2 * k], self.data[2 * k + 1]),
        }
    }

    /// Store bin `k`. The imaginary part is dropped for DC and Nyquist.
    #[inline]
    pub fn set_bin(&mut self, k: usize, re: f32, im: f32) {
        match k {
            0 => self.data[0] = re,
            k if k == BINS - 1 => self.data[1] = re,
            k => {
                self.data[2 * k] = re;
                self.data[2 * k + 1] = im;
            }
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data[..]
    }
}

#[inline]
fn bin_phase(re: f32, im: f32, amplitude: f32) -> f32 {
    if amplitude * (FRAME_SIZE as f32) < ZERO_AMP {
        0.0
    } else if libm::fabsf(im) < ZERO_AMP {
        if re < 0.0 {
            PI
        } else {
            0.0
        }
    } else {
        -libm::atan2f(im, re)
    }
}

/// Convert a packed spectrum into amplitude / instantaneous-frequency pairs.
///
/// `hop` is the analysis hop in samples. `last_phase` holds each bin's phase
/// from the previous frame and is overwritten with this frame's phases.
pub fn analyze(
    spectrum: &PackedSpectrum<'_>,
    hop: usize,
    last_phase: &mut [f32; BINS],
    partials: &mut [Partial; BINS],
) {
    let hop_f = hop as f32;
    for (k, (partial, last)) in partials.iter_mut().zip(last_phase.iter_mut()).enumerate() {
        let (re, im) = spectrum.bin(k);
        let amplitude = libm::hypotf(re, im);
        let phase = bin_phase(re, im, amplitude);

        let delta = phase - *last;
        *last = phase;

        let centre = bin_frequency(k);
        let deviation = wrap_phase(delta - hop_f * centre);
        *partial = Partial {
            amplitude,
            frequency: centre + deviation / hop_f,
        };
    }
}

/// Convert partials back into a packed spectrum, advancing each bin's
/// accumulated phase by `hop_out` samples at its instantaneous frequency.
pub fn synthesize(
    partials: &[Partial; BINS],
    hop_out: usize,
    accum_phase: &mut [f32; BINS],
    spectrum: &mut PackedSpectrum<'_>,
) {
    let hop_f = hop_out as f32;
    for (k, (partial, accum)) in partials.iter().zip(accum_phase.iter_mut()).enumerate() {
        *accum += hop_f * partial.frequency;
        let phase = *accum;
        spectrum.set_bin(
            k,
            partial.amplitude * libm::cosf(phase),
            -partial.amplitude * libm::sinf(phase),
        );
    }
}
