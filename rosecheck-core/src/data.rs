//! Core data types for rosecheck property testing.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Size parameter for controlling test data generation.
///
/// Larger sizes generate more complex test data: bigger magnitudes,
/// longer collections, deeper recursion. The driver cycles sizes from
/// zero up to its configured maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Size(pub usize);

impl Size {
    /// Create a new size value.
    pub fn new(value: usize) -> Self {
        Size(value)
    }

    /// Get the inner size value.
    pub fn get(&self) -> usize {
        self.0
    }
}

impl From<usize> for Size {
    fn from(value: usize) -> Self {
        Size(value)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Size({})", self.0)
    }
}

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Murmur-style 64-bit finalizer.
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 33)).wrapping_mul(0xff51_afd7_ed55_8ccd);
    z = (z ^ (z >> 33)).wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    z ^ (z >> 33)
}

/// Derive an odd gamma with enough bit transitions to keep split
/// streams from correlating.
fn mix_gamma(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z = (z ^ (z >> 31)) | 1;
    if (z ^ (z >> 1)).count_ones() < 24 {
        z ^ 0xaaaa_aaaa_aaaa_aaaa
    } else {
        z
    }
}

/// Splittable random seed for deterministic test generation.
///
/// A SplitMix64 state/gamma pair. Seeds split into independent
/// sub-streams rather than advancing a shared cursor, so generators can
/// split lazily and repeatedly without coupling: re-running any
/// generator with the same seed and size reproduces its output exactly.
///
/// `split` returns `(continuation, branch)`: the continuation carries on
/// the current lineage, the branch starts a fresh stream with a mixed
/// state and its own gamma. Callers consume the branch and keep
/// iterating on the continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed {
    state: u64,
    gamma: u64,
}

impl Seed {
    /// Create a seed from a single value.
    pub fn from_u64(value: u64) -> Self {
        Seed {
            state: value,
            gamma: GOLDEN_GAMMA,
        }
    }

    /// Seed from the wall clock, returning the raw millisecond value so
    /// the caller can record it for replay.
    pub fn from_millis() -> (u64, Self) {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        (millis, Seed::from_u64(millis))
    }

    /// Generate a random seed.
    pub fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        Seed::from_u64(rng.gen())
    }

    /// Split a seed into two independent seeds.
    pub fn split(self) -> (Self, Self) {
        let s1 = self.state.wrapping_add(self.gamma);
        let s2 = s1.wrapping_add(self.gamma);
        (
            Seed {
                state: s2,
                gamma: self.gamma,
            },
            Seed {
                state: mix64(s1),
                gamma: mix_gamma(s2),
            },
        )
    }

    /// Derive `n` independent seeds by repeated splitting.
    pub fn split_n(self, n: usize) -> Vec<Self> {
        let mut out = Vec::with_capacity(n);
        let mut current = self;
        for _ in 0..n {
            let (rest, branch) = current.split();
            out.push(branch);
            current = rest;
        }
        out
    }

    /// Next uniform 64-bit value and the advanced seed.
    pub fn next_u64(self) -> (u64, Self) {
        let state = self.state.wrapping_add(self.gamma);
        (
            mix64(state),
            Seed {
                state,
                gamma: self.gamma,
            },
        )
    }

    /// Next uniform value over the full signed 64-bit range.
    pub fn next_i64(self) -> (i64, Self) {
        let (value, seed) = self.next_u64();
        (value as i64, seed)
    }

    /// Next uniform double in `[0, 1)` with 53 bits of entropy.
    pub fn next_double(self) -> (f64, Self) {
        let (value, seed) = self.next_u64();
        ((value >> 11) as f64 * (1.0 / (1u64 << 53) as f64), seed)
    }

    /// Next uniform value in `[0, bound)`. `bound` must be non-zero.
    pub fn next_bounded(self, bound: u64) -> (u64, Self) {
        debug_assert!(bound > 0, "next_bounded requires a non-zero bound");
        let (value, seed) = self.next_u64();
        (((value as u128 * bound as u128) >> 64) as u64, seed)
    }

    /// Next uniform boolean.
    pub fn next_bool(self) -> (bool, Self) {
        let (value, seed) = self.next_u64();
        (value & 1 == 1, seed)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({}, {})", self.state, self.gamma)
    }
}

/// Configuration for a `quick_check` run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Seed for the run. `None` seeds from the wall clock; the chosen
    /// value is recorded in the report either way.
    pub seed: Option<u64>,

    /// Sizes cycle through `0..max_size` across trials.
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seed: None,
            max_size: 200,
        }
    }
}

impl Config {
    /// Fix the seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the size ceiling.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }
}
