//! Fixed-capacity sample buffers that slide left.
//!
//! A [`SlidingBuffer`] always holds exactly `N` samples. New samples enter at
//! the tail ([`SlidingBuffer::push`]) or are summed in from the front
//! ([`SlidingBuffer::accumulate`]); [`SlidingBuffer::advance`] discards
//! samples from the front and zero-fills the vacated tail.

use alloc::boxed::Box;

#[derive(Debug, Clone, PartialEq)]
pub struct SlidingBuffer<const N: usize> {
    data: Box<[f32; N]>,
}

impl<const N: usize> SlidingBuffer<N> {
    /// A zero-filled buffer.
    pub fn new() -> Self {
        Self {
            data: Box::new([0.0; N]),
        }
    }

    /// Shift the contents left by `hop.len()` and copy `hop` into the tail.
    ///
    /// # Panics
    ///
    /// If `hop` is longer than `N`.
    #[inline]
    pub fn push(&mut self, hop: &[f32]) {
        let h = hop.len();
        self.data.copy_within(h.., 0);
        self.data[N - h..].copy_from_slice(hop);
    }

    /// Discard the first `n` samples, shifting the rest left and zeroing the
    /// last `n` slots.
    ///
    /// # Panics
    ///
    /// If `n > N`.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.data.copy_within(n.., 0);
        self.data[N - n..].fill(0.0);
    }

    /// Overlap-add: `self[i] += frame[i]` for every sample of `frame`.
    #[inline]
    pub fn accumulate(&mut self, frame: &[f32]) {
        for (acc, &x) in self.data.iter_mut().zip(frame.iter()) {
            *acc += x;
        }
    }

    /// Zero every sample.
    #[inline]
    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    #[inline]
    pub fn as_array(&self) -> &[f32; N] {
        &self.data
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data[..]
    }

    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

impl<const N: usize> Default for SlidingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_slides_left() {
        let mut buf = SlidingBuffer::<6>::new();
        buf.push(&[1.0, 2.0]);
        buf.push(&[3.0, 4.0]);
        assert_eq!(buf.as_slice(), &[0.0, 0.0, 1.0, 2.0, 3.0, 4.0]);
        buf.push(&[5.0, 6.0, 7.0, 8.0]);
        assert_eq!(buf.as_slice(), &[3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn advance_zero_fills_tail() {
        let mut buf = SlidingBuffer::<5>::new();
        buf.accumulate(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        buf.advance(2);
        assert_eq!(buf.as_slice(), &[3.0, 4.0, 5.0, 0.0, 0.0]);
        buf.advance(5);
        assert_eq!(buf.as_slice(), &[0.0; 5]);
    }

    #[test]
    fn accumulate_adds() {
        let mut buf = SlidingBuffer::<4>::new();
        buf.accumulate(&[1.0, 1.0, 1.0, 1.0]);
        buf.accumulate(&[0.5, 0.5]);
        assert_eq!(buf.as_slice(), &[1.5, 1.5, 1.0, 1.0]);
        buf.clear();
        assert_eq!(buf.as_slice(), &[0.0; 4]);
    }

    #[test]
    #[should_panic]
    fn advance_past_capacity_panics() {
        let mut buf = SlidingBuffer::<4>::new();
        buf.advance(5);
    }
}
