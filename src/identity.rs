//! Identity hashing for integer keys.
//!
//! With [`IdentityBuildHasher`] an integer key's native hash code is the
//! integer itself, which makes bucket placement predictable: keys `1`, `33`
//! and `65` all land in bucket 1 of a 32-bucket table.

use core::hash::{BuildHasher, Hasher};

/// Builds [`IdentityHasher`]s. Stateless, so every instance hashes alike.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentityBuildHasher;

impl BuildHasher for IdentityBuildHasher {
    type Hasher = IdentityHasher;

    fn build_hasher(&self) -> Self::Hasher {
        IdentityHasher::default()
    }
}

/// Hashes a lone integer to itself. Further writes (tuple keys, strings)
/// are folded in with a multiplicative mix.
#[derive(Clone, Debug, Default)]
pub struct IdentityHasher {
    state: u64,
}

// FNV-1a 64-bit prime.
const BYTE_MIX: u64 = 0x0000_0100_0000_01b3;

impl IdentityHasher {
    // From the zero state this is `v` itself.
    #[inline]
    fn mix(&mut self, v: u64) {
        self.state = self.state.wrapping_mul(BYTE_MIX) ^ v;
    }
}

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state = (self.state ^ u64::from(b)).wrapping_mul(BYTE_MIX);
        }
    }

    fn write_u8(&mut self, i: u8) {
        self.mix(u64::from(i));
    }

    fn write_u16(&mut self, i: u16) {
        self.mix(u64::from(i));
    }

    fn write_u32(&mut self, i: u32) {
        self.mix(u64::from(i));
    }

    fn write_u64(&mut self, i: u64) {
        self.mix(i);
    }

    fn write_usize(&mut self, i: usize) {
        self.mix(i as u64);
    }

    fn write_i8(&mut self, i: i8) {
        self.mix(i as u64);
    }

    fn write_i16(&mut self, i: i16) {
        self.mix(i as u64);
    }

    fn write_i32(&mut self, i: i32) {
        self.mix(i as u64);
    }

    fn write_i64(&mut self, i: i64) {
        self.mix(i as u64);
    }

    fn write_isize(&mut self, i: isize) {
        self.mix(i as u64);
    }
}
