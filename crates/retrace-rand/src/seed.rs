//! Seed folding.
//!
//! Replay seeds are strings (they travel in the persisted run shape).
//! They are folded to a `u64` with FNV-1a before seeding the generator.
//! FNV-1a is fast and stable across platforms; it is not meant to be
//! collision-resistant.

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

/// Fold a string seed into a 64-bit generator seed.
///
/// The same string always yields the same value on every platform.
///
/// # Examples
///
/// ```
/// use retrace_rand::seed_from_str;
///
/// assert_eq!(seed_from_str("seed-A"), seed_from_str("seed-A"));
/// assert_ne!(seed_from_str("seed-A"), seed_from_str("seed-B"));
/// ```
pub fn seed_from_str(seed: &str) -> u64 {
    seed.bytes()
        .fold(FNV_OFFSET, |hash, b| (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}
