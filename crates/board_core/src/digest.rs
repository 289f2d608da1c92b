//! Deterministic 64-bit digests of board content.
//!
//! A digest is rebuilt from scratch every time it is requested. A
//! [`Digester`] owns a PRNG reseeded with [`DIGEST_SEED`], and each
//! structural field of a board pulls one value from that stream to scramble
//! its contribution before it is XOR-folded into the result:
//!
//! ```text
//! digest = mix(f0 ^ k0) ^ mix(f1 ^ k1) ^ ... ^ mix(fn ^ kn)
//! ```
//!
//! Because the stream is reseeded per call and the PRNG output is portable,
//! the same logical content yields the same digest in every process, on every
//! platform. Nothing here depends on addresses or allocation order; fields
//! must be fed in a fixed declared order.
//!
//! Per-object constants (one per chip kind, say) come from a [`DigestKeys`]
//! table. The table is built once from its own seed and never mutated, so it
//! can be shared between threads behind an `Arc`.

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Seed for the per-call digest stream.
pub const DIGEST_SEED: u64 = 0x1234_5678_9ABC_DEF0;

/// SplitMix64 finalizer. A bijection on `u64` with full avalanche.
#[inline(always)]
pub fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Accumulates field contributions into a digest.
pub struct Digester {
    rng: Xoshiro256PlusPlus,
    value: u64,
}

impl Default for Digester {
    fn default() -> Self {
        Self::new()
    }
}

impl Digester {
    /// Start a digest with the standard stream.
    pub fn new() -> Self {
        Self::with_seed(DIGEST_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            value: 0,
        }
    }

    /// Next scrambling value from the stream.
    #[inline]
    pub fn next_key(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Fold one integer field.
    #[inline]
    pub fn field(&mut self, v: u64) -> &mut Self {
        let k = self.next_key();
        self.value ^= mix64(v ^ k);
        self
    }

    #[inline]
    pub fn flag(&mut self, b: bool) -> &mut Self {
        self.field(b as u64)
    }

    /// Fold an ordered stack of per-object keys, bottom first.
    ///
    /// Every position consumes its own stream value, so reordering the stack
    /// changes the digest. The height is folded last.
    pub fn stack<I>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = u64>,
    {
        let mut height = 0u64;
        for key in keys {
            let k = self.next_key();
            self.value ^= mix64(key ^ k);
            height += 1;
        }
        self.field(height)
    }

    /// Fold a sub-digest computed elsewhere (e.g. a nested structure).
    #[inline]
    pub fn sub_digest(&mut self, d: u64) -> &mut Self {
        self.field(d)
    }

    pub fn finish(&self) -> u64 {
        self.value
    }
}

/// Read-only table of per-object random constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestKeys {
    seed: u64,
    keys: Vec<u64>,
}

impl DigestKeys {
    /// Draw `count` constants from a stream seeded with `seed`.
    pub fn new(seed: u64, count: usize) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let keys = (0..count).map(|_| rng.next_u64()).collect();
        Self { seed, keys }
    }

    #[inline(always)]
    pub fn key(&self, index: usize) -> u64 {
        self.keys[index]
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
#[path = "digest_tests.rs"]
mod digest_tests;
