//! Fast Fourier Transform (FFT) kernel.
//!
//! In-place iterative radix-2 decimation-in-time
//! [Cooley–Tukey](https://en.wikipedia.org/wiki/Cooley%E2%80%93Tukey_FFT_algorithm)
//! transform over interleaved `(re, im)` pairs stored in a flat `f32` slice,
//! plus a packed real-input transform built on a half-size complex FFT.
//!
//! Conventions:
//!
//! - The forward transform uses the positive exponent,
//!   `X[k] = 1/L * sum x[n] * e^{+2πi kn/L}` where `L` is the slice length in
//!   floats. The inverse multiplies by 2, so forward followed by inverse is the
//!   identity.
//! - Twiddle factors are produced per stage by an angle-sum recurrence seeded
//!   with `wpr = -2 sin²(θ/2)` and `wpi = sin θ`. No trigonometric function is
//!   evaluated inside the butterflies; the rounding drift this causes over
//!   `log2` stages is accepted.
//! - [`real_fft`] packs `L/2 + 1` bins into `L` floats: slot 0 holds the
//!   (real) DC bin, slot 1 the (real) Nyquist bin, and slots `2k, 2k + 1` the
//!   real and imaginary parts of bin `k` for `0 < k < L/2`.

use core::f32::consts::PI;
use core::fmt;

const TWO_PI: f32 = 2.0 * PI;

/// Number of floats that make up one complex value.
pub const STRIDE: usize = 2;

/// Transform direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

impl Direction {
    #[inline]
    fn is_forward(self) -> bool {
        matches!(self, Direction::Forward)
    }
}

/// Errors returned by the checked transform entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    /// The buffer was empty.
    EmptyInput,
    /// The buffer does not hold a whole number of complex pairs.
    OddLength,
    /// The number of complex pairs is not a power of two.
    NonPowerOfTwo,
}

impl fmt::Display for FftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FftError::EmptyInput => write!(f, "input buffer is empty"),
            FftError::OddLength => write!(f, "input length must be a multiple of {}", STRIDE),
            FftError::NonPowerOfTwo => {
                write!(f, "number of complex pairs must be a power of two")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FftError {}

/// Validate that `len` floats form a power-of-two number of complex pairs.
fn check_len(len: usize) -> Result<(), FftError> {
    if len == 0 {
        return Err(FftError::EmptyInput);
    }
    if len % STRIDE != 0 {
        return Err(FftError::OddLength);
    }
    if !(len / STRIDE).is_power_of_two() {
        return Err(FftError::NonPowerOfTwo);
    }
    Ok(())
}

/// Seeds of the twiddle recurrence for a stage angle `theta`.
#[inline]
fn recurrence_seeds(theta: f32) -> (f32, f32) {
    let half = libm::sin(0.5 * theta as f64);
    ((-2.0 * half * half) as f32, libm::sin(theta as f64) as f32)
}

/// Permute interleaved complex pairs into bit-reversed index order in place.
///
/// `x.len()` must be a power-of-two multiple of [`STRIDE`]; other lengths
/// leave the buffer in an unspecified permutation.
pub fn bit_reverse(x: &mut [f32]) {
    let n = x.len();
    let mut j = 0;
    for i in (0..n).step_by(STRIDE) {
        if j > i {
            x.swap(i, j);
            x.swap(i + 1, j + 1);
        }
        let mut m = n >> 1;
        while m >= 2 && j >= m {
            j -= m;
            m >>= 1;
        }
        j += m;
    }
}

/// Complex FFT over `x.len() / 2` interleaved pairs.
///
/// # Errors
///
/// Returns [`FftError`] if the buffer is empty, has an odd length, or does not
/// contain a power-of-two number of pairs.
pub fn complex_fft(x: &mut [f32], direction: Direction) -> Result<(), FftError> {
    check_len(x.len())?;
    complex_fft_unchecked(x, direction);
    Ok(())
}

pub(crate) fn complex_fft_unchecked(x: &mut [f32], direction: Direction) {
    let nd = x.len();
    bit_reverse(x);

    let mut mmax = STRIDE;
    while mmax < nd {
        let delta = mmax << 1;
        let theta = if direction.is_forward() {
            TWO_PI / mmax as f32
        } else {
            TWO_PI / -(mmax as f32)
        };
        let (wpr, wpi) = recurrence_seeds(theta);
        let mut wr = 1.0f32;
        let mut wi = 0.0f32;
        for m in (0..mmax).step_by(STRIDE) {
            for i in (m..nd).step_by(delta) {
                let j = i + mmax;
                let rtemp = wr * x[j] - wi * x[j + 1];
                let itemp = wr * x[j + 1] + wi * x[j];
                x[j] = x[i] - rtemp;
                x[j + 1] = x[i + 1] - itemp;
                x[i] += rtemp;
                x[i + 1] += itemp;
            }
            let t = wr;
            wr = t * wpr - wi * wpi + t;
            wi = wi * wpr + t * wpi + wi;
        }
        mmax = delta;
    }

    let scale = if direction.is_forward() {
        1.0 / nd as f32
    } else {
        2.0
    };
    for v in x.iter_mut() {
        *v *= scale;
    }
}

/// Real FFT of `x.len()` samples, packed in place (see the module docs).
///
/// The forward direction turns real samples into the packed spectrum; the
/// inverse direction turns a packed spectrum back into real samples.
///
/// # Errors
///
/// Returns [`FftError`] under the same conditions as [`complex_fft`]. At least
/// two complex pairs (four floats) are required.
pub fn real_fft(x: &mut [f32], direction: Direction) -> Result<(), FftError> {
    check_len(x.len())?;
    if x.len() < 2 * STRIDE {
        return Err(FftError::NonPowerOfTwo);
    }
    real_fft_unchecked(x, direction);
    Ok(())
}

pub(crate) fn real_fft_unchecked(x: &mut [f32], direction: Direction) {
    // Number of complex pairs in the half-size transform.
    let n = x.len() / STRIDE;
    let forward = direction.is_forward();

    let mut theta = PI / n as f32;
    let c1 = 0.5f32;
    let c2;
    let mut xr;
    let xi;
    if forward {
        c2 = -0.5f32;
        complex_fft_unchecked(x, direction);
        xr = x[0];
        xi = x[1];
    } else {
        c2 = 0.5f32;
        theta = -theta;
        xr = x[1];
        xi = 0.0;
        x[1] = 0.0;
    }

    let (wpr, wpi) = recurrence_seeds(theta);
    let mut wr = 1.0f32;
    let mut wi = 0.0f32;
    let n2p1 = (n << 1) + 1;
    for i in 0..=(n >> 1) {
        let i1 = i << 1;
        let i2 = i1 + 1;
        let i3 = n2p1 - i2;
        let i4 = i3 + 1;
        if i == 0 {
            let h1r = c1 * (x[i1] + xr);
            let h1i = c1 * (x[i2] - xi);
            let h2r = -c2 * (x[i2] + xi);
            let h2i = c2 * (x[i1] - xr);
            x[i1] = h1r + wr * h2r - wi * h2i;
            x[i2] = h1i + wr * h2i + wi * h2r;
            // The mirror of bin 0 is the Nyquist slot; only its real part survives.
            xr = h1r - wr * h2r + wi * h2i;
        } else {
            let h1r = c1 * (x[i1] + x[i3]);
            let h1i = c1 * (x[i2] - x[i4]);
            let h2r = -c2 * (x[i2] + x[i4]);
            let h2i = c2 * (x[i1] - x[i3]);
            x[i1] = h1r + wr * h2r - wi * h2i;
            x[i2] = h1i + wr * h2i + wi * h2r;
            x[i3] = h1r - wr * h2r + wi * h2i;
            x[i4] = -h1i + wr * h2i + wi * h2r;
        }
        let t = wr;
        wr = t * wpr - wi * wpi + t;
        wi = wi * wpr + t * wpi + wi;
    }

    if forward {
        x[1] = xr;
    } else {
        complex_fft_unchecked(x, direction);
    }
}
