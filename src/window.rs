//! Hann window table and the windowing steps around the transform.

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::f32::consts::PI;

use crate::FRAME_SIZE;

/// Mean of the squared Hann window, the per-frame energy weight used when
/// predicting overlap-add gain.
pub const HANN_SQUARED_MEAN: f32 = 3.0 / 8.0;

#[inline]
fn hann_fill(out: &mut [f32]) {
    let n = out.len();
    if n <= 1 {
        out.iter_mut().for_each(|c| *c = 1.0);
        return;
    }
    let denom = (n - 1) as f32;
    for (i, c) in out.iter_mut().enumerate() {
        *c = 0.5 - 0.5 * libm::cosf(2.0 * PI * i as f32 / denom);
    }
}

/// MCU/stack-only, const-generic, in-place symmetric Hann window (no heap)
pub fn hann_inplace_stack<const N: usize>(out: &mut [f32; N]) {
    hann_fill(out);
}

/// Energy normalization applied to each synthesized frame.
///
/// Using a synthesis hop different from the analysis hop changes the overlap
/// factor, so the frame is scaled by `1 / sqrt(FRAME_SIZE / hop_out / 2)`.
/// A zero hop yields a zero scale.
pub fn synthesis_scale(hop_out: usize) -> f32 {
    let ratio = FRAME_SIZE as f64 / hop_out as f64 / 2.0;
    (1.0 / libm::sqrt(ratio)) as f32
}

/// Precomputed [`FRAME_SIZE`]-point Hann coefficients.
///
/// Read-only after construction; instances share one table through an
/// [`Arc`].
#[derive(Debug, Clone, PartialEq)]
pub struct WindowTable {
    coeffs: Box<[f32; FRAME_SIZE]>,
}

impl WindowTable {
    /// Build the Hann table.
    pub fn hann() -> Self {
        let mut coeffs = Box::new([0.0f32; FRAME_SIZE]);
        hann_inplace_stack(&mut *coeffs);
        #[cfg(feature = "verbose-logging")]
        log::debug!("built {}-point Hann window table", FRAME_SIZE);
        Self { coeffs }
    }

    /// The process-wide table, built on first use.
    #[cfg(feature = "std")]
    pub fn shared() -> Arc<Self> {
        static SHARED: std::sync::OnceLock<Arc<WindowTable>> = std::sync::OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(WindowTable::hann())))
    }

    /// Wrap a freshly built table for sharing between instances.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    #[inline]
    pub fn coefficients(&self) -> &[f32; FRAME_SIZE] {
        &self.coeffs
    }

    /// `output[i] = input[i] * w[i] * scale`.
    #[inline]
    pub fn apply(&self, input: &[f32; FRAME_SIZE], output: &mut [f32; FRAME_SIZE], scale: f32) {
        for ((o, &x), &w) in output.iter_mut().zip(input.iter()).zip(self.coeffs.iter()) {
            *o = x * w * scale;
        }
    }

    /// Window `frame` in place with an extra gain of `scale`.
    #[inline]
    pub fn apply_in_place(&self, frame: &mut [f32; FRAME_SIZE], scale: f32) {
        for (x, &w) in frame.iter_mut().zip(self.coeffs.iter()) {
            *x = *x * w * scale;
        }
    }
}

impl Default for WindowTable {
    fn default() -> Self {
        Self::hann()
    }
}
