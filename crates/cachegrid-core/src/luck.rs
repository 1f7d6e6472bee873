//! Stable string → `[0, 1)` hashing.
//!
//! The seed string is folded with 64-bit FNV-1a and the result seeds a
//! [`StdRng`]; its first `f64` draw is the answer. Nothing here reads global
//! state, so the same string gives the same number on every run.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over the UTF-8 bytes of `s`.
pub fn fnv1a(s: &str) -> u64 {
    s.bytes().fold(FNV_OFFSET, |h, b| (h ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

/// Map `seed` to a reproducible value in `[0, 1)`.
pub fn luck(seed: &str) -> f64 {
    let mut rng = StdRng::seed_from_u64(fnv1a(seed));
    rng.random::<f64>()
}
