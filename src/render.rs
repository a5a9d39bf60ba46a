//! Offline rendering of whole clips.
//!
//! [`OfflineRenderer`] runs a fresh [`PitchShifter`] across a complete buffer,
//! following an [`Envelope`] hop by hop and compensating for the streaming
//! latency so the result lines up with the input. [`RenderCache`] keeps
//! finished renders keyed by a BLAKE3 digest of what produced them.

use alloc::sync::Arc;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::envelope::Envelope;
use crate::shifter::{checked_hop_out, PitchShifter, ShiftError};
use crate::window::WindowTable;
use crate::{FRAME_SIZE, HOP_SIZE, LATENCY};

/// Default number of renders a [`RenderCache`] keeps before it is flushed.
pub const DEFAULT_CACHE_ENTRIES: usize = 64;

#[cfg(feature = "std")]
static CACHE_ENTRIES: std::sync::OnceLock<usize> = std::sync::OnceLock::new();

/// Cache capacity, overridable once per process through
/// `PVSHIFT_RENDER_CACHE_ENTRIES`.
#[cfg(feature = "std")]
pub fn default_cache_entries() -> usize {
    *CACHE_ENTRIES.get_or_init(|| {
        std::env::var("PVSHIFT_RENDER_CACHE_ENTRIES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_CACHE_ENTRIES)
    })
}

/// Number of full analysis frames in a clip of `len` samples.
pub fn frame_count(len: usize) -> usize {
    if len < FRAME_SIZE {
        0
    } else {
        1 + (len - FRAME_SIZE) / HOP_SIZE
    }
}

/// Whole-buffer renderer.
#[derive(Debug, Clone)]
pub struct OfflineRenderer {
    window: Arc<WindowTable>,
}

impl OfflineRenderer {
    /// Renderer backed by the process-wide window table.
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        Self::with_window(WindowTable::shared())
    }

    pub fn with_window(window: Arc<WindowTable>) -> Self {
        Self { window }
    }

    /// Pitch-shift `input` following `envelope`.
    ///
    /// Hop `h` of the input is shifted by `envelope.factor_at(h)`. The output
    /// has exactly `input.len()` samples; bypass envelopes return an
    /// unmodified copy.
    ///
    /// # Errors
    ///
    /// [`ShiftError`] if any hop's factor is non-finite or maps to a
    /// synthesis hop outside the supported range. Factors are checked before
    /// any audio is processed.
    pub fn render(&self, input: &[f32], envelope: &Envelope) -> Result<Arc<[f32]>, ShiftError> {
        if envelope.is_bypass() {
            #[cfg(feature = "verbose-logging")]
            log::debug!("bypass render of {} samples", input.len());
            return Ok(Arc::from(input));
        }

        let hops = (input.len() + LATENCY).div_ceil(HOP_SIZE);
        let factors = (0..hops)
            .map(|h| {
                let factor = envelope.factor_at(h);
                checked_hop_out(factor).map(|_| factor)
            })
            .collect::<Result<Vec<f32>, ShiftError>>()?;

        #[cfg(feature = "verbose-logging")]
        log::debug!("rendering {} samples over {} hops", input.len(), hops);

        let mut shifter = PitchShifter::with_window(Arc::clone(&self.window));
        let mut rendered = Vec::with_capacity(hops * HOP_SIZE);
        let mut block = [0.0f32; HOP_SIZE];
        let mut out = [0.0f32; HOP_SIZE];
        for (h, &factor) in factors.iter().enumerate() {
            let start = (h * HOP_SIZE).min(input.len());
            let end = ((h + 1) * HOP_SIZE).min(input.len());
            block.fill(0.0);
            block[..end - start].copy_from_slice(&input[start..end]);
            shifter.try_process(&block, &mut out, factor)?;
            rendered.extend_from_slice(&out);
        }

        Ok(Arc::from(&rendered[LATENCY..LATENCY + input.len()]))
    }
}

#[cfg(feature = "std")]
impl Default for OfflineRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Content-addressed store of finished renders.
///
/// Once the cache holds more than `capacity` entries the next insertion
/// flushes it completely.
#[derive(Debug, Clone)]
pub struct RenderCache {
    capacity: usize,
    entries: HashMap<[u8; 32], Arc<[f32]>>,
}

impl RenderCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
        }
    }

    /// Cache sized from `PVSHIFT_RENDER_CACHE_ENTRIES` (default 64).
    #[cfg(feature = "std")]
    pub fn from_env() -> Self {
        Self::new(default_cache_entries())
    }

    /// BLAKE3 digest of the input samples and envelope breakpoints.
    pub fn key(input: &[f32], envelope: &Envelope) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(input.len() as u64).to_le_bytes());
        for s in input {
            hasher.update(&s.to_le_bytes());
        }
        for p in envelope.points() {
            hasher.update(&(p.frame as u64).to_le_bytes());
            hasher.update(&p.semitones.to_le_bytes());
        }
        *hasher.finalize().as_bytes()
    }

    pub fn get(&self, key: &[u8; 32]) -> Option<Arc<[f32]>> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: [u8; 32], rendered: Arc<[f32]>) {
        if self.entries.len() > self.capacity {
            #[cfg(feature = "verbose-logging")]
            log::debug!("render cache over capacity ({}), flushing", self.entries.len());
            self.entries.clear();
        }
        self.entries.insert(key, rendered);
    }

    /// Return the cached render for `(input, envelope)`, rendering and
    /// storing it on a miss.
    pub fn render(
        &mut self,
        renderer: &OfflineRenderer,
        input: &[f32],
        envelope: &Envelope,
    ) -> Result<Arc<[f32]>, ShiftError> {
        let key = Self::key(input, envelope);
        if let Some(hit) = self.get(&key) {
            #[cfg(feature = "verbose-logging")]
            log::debug!("render cache hit");
            return Ok(hit);
        }
        let rendered = renderer.render(input, envelope)?;
        self.insert(key, Arc::clone(&rendered));
        Ok(rendered)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(feature = "std")]
impl Default for RenderCache {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Render independent clips concurrently, one shifter per clip.
///
/// Results come back in job order. The first failing job's error is
/// returned.
#[cfg(feature = "parallel")]
pub fn render_batch(
    window: &Arc<WindowTable>,
    jobs: &[(&[f32], &Envelope)],
) -> Result<Vec<Vec<f32>>, ShiftError> {
    use rayon::prelude::*;

    #[cfg(feature = "verbose-logging")]
    log::debug!("batch rendering {} clips", jobs.len());
    let renderer = OfflineRenderer::with_window(Arc::clone(window));
    jobs.par_iter()
        .map(|(input, envelope)| renderer.render(input, envelope).map(|r| r.to_vec()))
        .collect()
}
