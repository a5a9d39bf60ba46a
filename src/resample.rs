//! Hop resampling.
//!
//! The synthesis hop varies with the pitch factor but the caller always
//! receives a fixed-size block. [`interpolate_fit`] stretches or squeezes the
//! first `hop_out` samples of the overlap accumulator into that block with
//! linear interpolation, which is what turns the vocoder's time stretch into
//! a pitch shift.

/// Linearly resample `source[..=hop_out]` into `output`.
///
/// A fractional read position starts at 0 and advances by
/// `hop_out / output.len()` per output sample; each sample blends the two
/// source samples bracketing the position. Slots left once the position
/// reaches `hop_out` are filled with `source[hop_out]`.
///
/// # Panics
///
/// If `source.len() <= hop_out`.
pub fn interpolate_fit(source: &[f32], hop_out: usize, output: &mut [f32]) {
    let limit = hop_out as f32;
    let step = hop_out as f32 / output.len() as f32;
    let mut position = 0.0f32;
    let mut filled = 0;
    while position < limit && filled < output.len() {
        let index = libm::floorf(position) as usize;
        let lo = source[index];
        let hi = source[index + 1];
        output[filled] = lo + (hi - lo) * (position - index as f32);
        filled += 1;
        position += step;
    }
    let hold = source[hop_out];
    output[filled..].fill(hold);
}
