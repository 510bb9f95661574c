//! Hash primitive used to derive bit offsets
//!
//! Uses MurmurHash3 (x86, 32-bit) which is fast, uniform and stable across
//! platforms and process restarts. Remote filters rely on that stability:
//! two processes sharing a key must derive identical offsets for one element.

use std::io::Cursor;

/// Largest value an encrypted hash may take (exclusive)
pub const HASH_MODULUS: u32 = i32::MAX as u32;

/// A deterministic string hash whose output fits a non-negative `i32`
pub trait Encryptor: Send + Sync {
    /// Hash `input` to a value in `[0, i32::MAX)`
    fn encrypt(&self, input: &str) -> u32;
}

/// MurmurHash3 backed encryptor
#[derive(Clone, Copy, Debug, Default)]
pub struct Murmur3Encryptor {
    seed: u32,
}

impl Murmur3Encryptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a non-zero seed. Filters sharing a bit array must agree on it.
    pub fn with_seed(seed: u32) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Encryptor for Murmur3Encryptor {
    fn encrypt(&self, input: &str) -> u32 {
        let mut cursor = Cursor::new(input.as_bytes());
        // Reading from an in-memory cursor cannot fail
        let hash = murmur3::murmur3_32(&mut cursor, self.seed).unwrap_or(0);
        hash % HASH_MODULUS
    }
}
