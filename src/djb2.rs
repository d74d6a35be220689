//! djb2 string hash (`h = h * 33 + c`, seeded with 5381).

use core::hash::{BuildHasher, Hasher};

const DJB2_SEED: u64 = 5381;

/// Hash `bytes` with djb2 using wrapping `u64` arithmetic.
#[inline]
pub fn djb2(bytes: &[u8]) -> u64 {
    bytes.iter().fold(DJB2_SEED, |h, &c| {
        h.wrapping_shl(5).wrapping_add(h).wrapping_add(u64::from(c))
    })
}

/// Streaming djb2. Successive `write` calls hash as if the bytes were
/// concatenated. Integer writes (including the length prefix std emits for
/// `[u8]: Hash`) also feed the stream, so the table hashes keys through
/// `write` directly to keep the result equal to `djb2(key)`.
#[derive(Debug, Clone, Copy)]
pub struct Djb2Hasher {
    hash: u64,
}

impl Djb2Hasher {
    pub fn new() -> Self {
        Self { hash: DJB2_SEED }
    }
}

impl Default for Djb2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Djb2Hasher {
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for &c in bytes {
            self.hash = self
                .hash
                .wrapping_shl(5)
                .wrapping_add(self.hash)
                .wrapping_add(u64::from(c));
        }
    }
}

/// `BuildHasher` for [`Djb2Hasher`]; the default hasher of `HashTable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildDjb2;

impl BuildHasher for BuildDjb2 {
    type Hasher = Djb2Hasher;

    fn build_hasher(&self) -> Self::Hasher {
        Djb2Hasher::new()
    }
}
