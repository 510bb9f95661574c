//! Hash chain offset generation
//!
//! Derives k bit offsets from one element and one hash primitive. Round 0
//! hashes the element itself; every later round hashes the decimal string of
//! the previous round's raw hash. Rounds are correlated through the chain,
//! which is the accepted price for not needing k independent hash functions.

use std::borrow::Cow;

use super::encryptor::Encryptor;

/// How each round's raw hash is turned into an offset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainMode {
    /// `hash % modulus`, for arrays that address bits themselves
    Reduced { modulus: u32 },
    /// Unreduced hash, for stores that do their own bit addressing
    Raw,
}

impl ChainMode {
    #[inline]
    fn apply(self, hash: u32) -> u32 {
        match self {
            ChainMode::Reduced { modulus } => hash % modulus,
            ChainMode::Raw => hash,
        }
    }
}

/// Compute the `rounds` offsets for `input`
///
/// Always returns exactly `rounds` values. The chain input is only
/// re-derived between rounds, never after the last one.
///
/// # Panics
/// Panics if `mode` is `Reduced` with a zero modulus. Validated filter
/// parameters never produce one.
pub fn chain_offsets<E>(encryptor: &E, input: &str, rounds: u32, mode: ChainMode) -> Vec<u32>
where
    E: Encryptor + ?Sized,
{
    let mut offsets = Vec::with_capacity(rounds as usize);
    let mut origin: Cow<'_, str> = Cow::Borrowed(input);

    for round in 0..rounds {
        let hash = encryptor.encrypt(&origin);
        offsets.push(mode.apply(hash));
        if round + 1 == rounds {
            break;
        }
        origin = Cow::Owned(hash.to_string());
    }

    offsets
}
