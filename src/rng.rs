//! Seeded deterministic random number generator
//!
//! Mulberry-style 32-bit mixer. Integer-only state transitions, so the
//! output stream is bit-identical across platforms for a given seed. The
//! generator is stateful and stream-ordered: every consumer owns its own
//! instance and must keep its draw order fixed, because generation fixtures
//! compare against exact draw sequences.

/// Stream-ordered PRNG producing floats in `[0, 1)`
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Golden-ratio constant used for zero-seed substitution and stream mixing
    const GOLDEN: u32 = 0x9E37_79B1;

    pub fn new(seed: u32) -> Self {
        // A zero seed would still mix fine, but recorded fixtures depend
        // on the golden-ratio substitution.
        let state = if seed == 0 { Self::GOLDEN } else { seed };
        Self { state }
    }

    /// Derive the per-sector stream: run seed mixed with the sector index
    pub fn for_sector(seed: u32, sector: u32) -> Self {
        Self::new(seed ^ sector.wrapping_mul(Self::GOLDEN))
    }

    /// Advance the state and return the next raw 32-bit draw
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(1 | a);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t));
        t ^ (t >> 14)
    }

    /// Next float in `[0, 1)`
    pub fn next(&mut self) -> f32 {
        // Top 24 bits only: a full-width quotient rounds to 1.0f32 for
        // raw draws near u32::MAX, breaking the half-open interval.
        (self.next_u32() >> 8) as f32 / 16_777_216.0
    }

    /// Uniform float in `[min, max)` (one draw)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next() * (max - min)
    }

    /// True with probability `p` (one draw)
    pub fn chance(&mut self, p: f32) -> bool {
        self.next() < p
    }

    /// Uniform index in `[0, len)` (one draw). `len` must be non-zero.
    pub fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.next() as f64 * len as f64) as usize).min(len - 1)
    }

    /// Uniform integer in `[min, max]` inclusive (one draw)
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        min + self.pick_index((max - min + 1) as usize) as i32
    }
}
