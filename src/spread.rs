//! Hash spreading and bucket index math.
//!
//! Bucket indices are taken from the low bits of a hash. For small tables
//! the high bits would never participate, so the upper half of the hash is
//! folded into the lower half before masking.

/// Number of bits folded down by [`spread`]: half the width of `u64`.
const HALF_BITS: u32 = u64::BITS / 2;

/// Mixes a native hash code so its high bits influence low-bit masking.
#[inline]
pub fn spread(h: u64) -> u64 {
    h ^ (h >> HALF_BITS)
}

/// Bucket index of `hash` in a table of `capacity` buckets.
///
/// `capacity` must be a nonzero power of two.
#[inline]
pub fn bucket_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    (hash as usize) & (capacity - 1)
}
