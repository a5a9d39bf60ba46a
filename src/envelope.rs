//! Pitch-bend envelopes.
//!
//! An [`Envelope`] is a list of [`BendPoint`]s: semitone offsets pinned to
//! analysis-frame (hop) indices. Between points the offset is interpolated
//! linearly; outside them the nearest point's value is held.

use alloc::vec::Vec;
use core::fmt;

/// Convert a semitone offset into a frequency ratio, `2^(semitones / 12)`.
#[inline]
pub fn semitones_to_factor(semitones: f32) -> f32 {
    libm::powf(2.0, semitones / 12.0)
}

/// A breakpoint: `semitones` at hop index `frame`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BendPoint {
    pub frame: usize,
    pub semitones: f32,
}

impl BendPoint {
    pub fn new(frame: usize, semitones: f32) -> Self {
        Self { frame, semitones }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeError {
    /// No breakpoints were given.
    Empty,
    /// The breakpoint at `index` has a NaN or infinite offset.
    NonFiniteSemitones { index: usize },
    /// The breakpoint at `index` does not come strictly after its predecessor.
    UnorderedPoints { index: usize },
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeError::Empty => write!(f, "envelope has no breakpoints"),
            EnvelopeError::NonFiniteSemitones { index } => {
                write!(f, "breakpoint {} has a non-finite semitone offset", index)
            }
            EnvelopeError::UnorderedPoints { index } => write!(
                f,
                "breakpoint {} does not come strictly after the previous one",
                index
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EnvelopeError {}

/// Validated, time-ordered semitone envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    points: Vec<BendPoint>,
}

impl Envelope {
    /// Build an envelope from breakpoints sorted by strictly increasing frame.
    pub fn new(points: Vec<BendPoint>) -> Result<Self, EnvelopeError> {
        if points.is_empty() {
            return Err(EnvelopeError::Empty);
        }
        for (index, p) in points.iter().enumerate() {
            if !p.semitones.is_finite() {
                return Err(EnvelopeError::NonFiniteSemitones { index });
            }
            if index > 0 && p.frame <= points[index - 1].frame {
                return Err(EnvelopeError::UnorderedPoints { index });
            }
        }
        Ok(Self { points })
    }

    /// A single-point envelope holding `semitones` everywhere.
    ///
    /// A non-finite offset is stored as is; rendering rejects the resulting
    /// factor.
    pub fn constant(semitones: f32) -> Self {
        Self {
            points: alloc::vec![BendPoint::new(0, semitones)],
        }
    }

    pub fn points(&self) -> &[BendPoint] {
        &self.points
    }

    /// True when every breakpoint is 0 semitones, so rendering can copy the
    /// input unchanged.
    pub fn is_bypass(&self) -> bool {
        self.points.iter().all(|p| p.semitones == 0.0)
    }

    /// Semitone offset at hop index `frame`.
    pub fn value_at(&self, frame: usize) -> f32 {
        let first = self.points[0];
        if frame <= first.frame {
            return first.semitones;
        }
        // Index of the first breakpoint strictly after `frame`.
        let next = self.points.partition_point(|p| p.frame <= frame);
        if next == self.points.len() {
            return self.points[next - 1].semitones;
        }
        let a = self.points[next - 1];
        let b = self.points[next];
        let t = (frame - a.frame) as f32 / (b.frame - a.frame) as f32;
        a.semitones + (b.semitones - a.semitones) * t
    }

    /// [`Envelope::value_at`] for frames `0..num_frames`.
    pub fn frame_values(&self, num_frames: usize) -> Vec<f32> {
        (0..num_frames).map(|f| self.value_at(f)).collect()
    }

    /// Pitch factor at hop index `frame`.
    #[inline]
    pub fn factor_at(&self, frame: usize) -> f32 {
        semitones_to_factor(self.value_at(frame))
    }
}
