//! Content-seeded pseudo-random stream
//!
//! A 32-bit rolling hash of the fingerprint seeds a linear congruential
//! generator (multiplier 9301, increment 49297, modulus 233280). Every draw
//! advances one shared state, so callers must consume draws in a fixed order.

const LCG_MULTIPLIER: u64 = 9301;
const LCG_INCREMENT: u64 = 49297;
const LCG_MODULUS: u64 = 233_280;

/// Derive the generator seed from a fingerprint
///
/// Folds `acc = (acc << 5) - acc + unit` over the UTF-16 code units with
/// 32-bit signed wrap-around, then takes the absolute value. For ASCII
/// fingerprints (base64) the code units are exactly the bytes.
pub fn fingerprint_seed(fingerprint: &str) -> u32 {
    let hash = fingerprint.encode_utf16().fold(0i32, |acc, unit| {
        acc.wrapping_shl(5)
            .wrapping_sub(acc)
            .wrapping_add(i32::from(unit))
    });
    // i32::MIN has no positive i32 counterpart; unsigned_abs keeps it as 2^31
    hash.unsigned_abs()
}

/// Deterministic draw source for reading generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    /// Seed the stream from fingerprint contents
    pub fn from_fingerprint(fingerprint: &str) -> Self {
        Self::with_seed(fingerprint_seed(fingerprint))
    }

    /// Seed the stream directly
    pub fn with_seed(seed: u32) -> Self {
        Self {
            state: u64::from(seed),
        }
    }

    /// Current raw LCG state
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Advance the stream and return a draw in `[0, 1)`
    pub fn next_draw(&mut self) -> f64 {
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }

    /// Draw an index in `0..len`
    ///
    /// `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "cannot draw an index into an empty pool");
        let index = (self.next_draw() * len as f64).floor() as usize;
        index.min(len.saturating_sub(1))
    }

    /// Draw an integer in `base..base + span`
    pub fn next_in_span(&mut self, base: usize, span: usize) -> usize {
        base + (self.next_draw() * span as f64).floor() as usize
    }

    /// Pick one element, consuming exactly one draw
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.next_index(items.len())]
    }

    /// Pick up to `count` distinct elements, consuming one draw per pick
    ///
    /// Each draw indexes into the pool that remains after earlier picks, so
    /// the draw distribution shifts as the pool shrinks.
    pub fn choices<T: Clone>(&mut self, items: &[T], count: usize) -> Vec<T> {
        let mut available: Vec<T> = items.to_vec();
        let mut picked = Vec::with_capacity(count.min(available.len()));

        while picked.len() < count && !available.is_empty() {
            let index = self.next_index(available.len());
            picked.push(available.remove(index));
        }

        picked
    }
}
