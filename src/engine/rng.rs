//! Random sources for trajectory simulation.
//!
//! The engine draws growth-rate noise through the [`NormalSource`] trait so
//! callers can substitute a seeded or scripted generator. The default
//! implementation is xoshiro256** with jump-based stream splitting, which
//! gives each parallel worker a disjoint random stream without locking.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

/// A source of standard-normal samples.
///
/// Implementations need not be thread-safe; the engine hands each worker its
/// own source.
pub trait NormalSource {
    /// Draw one sample from the standard normal distribution N(0, 1).
    fn next_standard_normal(&mut self) -> f64;
}

/// xoshiro256** PRNG with Box-Muller normal output.
#[derive(Debug, Clone)]
pub struct Xoshiro256 {
    s: [u64; 4],
}

impl Xoshiro256 {
    /// Create a generator from a seed, expanded via SplitMix64.
    pub fn new(seed: u64) -> Self {
        let mut z = seed;
        let mut s = [0u64; 4];
        for item in &mut s {
            z = z.wrapping_add(0x9e3779b97f4a7c15);
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
            *item = z ^ (z >> 31);
        }
        Self { s }
    }

    /// Advance the state by 2^128 draws.
    ///
    /// Cloning before each jump yields non-overlapping streams for parallel
    /// workers.
    pub fn jump(&mut self) {
        const JUMP: [u64; 4] =
            [0x180ec6d33cfd0aba, 0xd5a61266f0c9392c, 0xa9582618e03fc9aa, 0x39abdc4529b1661c];
        let mut s0: u64 = 0;
        let mut s1: u64 = 0;
        let mut s2: u64 = 0;
        let mut s3: u64 = 0;
        for j in &JUMP {
            for b in 0..64 {
                if j & (1u64 << b) != 0 {
                    s0 ^= self.s[0];
                    s1 ^= self.s[1];
                    s2 ^= self.s[2];
                    s3 ^= self.s[3];
                }
                self.next_u64();
            }
        }
        self.s = [s0, s1, s2, s3];
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.s[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.s[1] << 17;
        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];
        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);
        result
    }

    /// Generate uniform f64 in [0, 1).
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

impl NormalSource for Xoshiro256 {
    /// Box-Muller transform of two uniform draws.
    fn next_standard_normal(&mut self) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

/// Produce a nondeterministic seed from the process hasher entropy.
pub fn entropy_seed() -> u64 {
    RandomState::new().build_hasher().finish()
}
