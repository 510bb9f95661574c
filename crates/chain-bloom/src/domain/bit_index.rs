//! Packed bit array addressing
//!
//! A logical bit `i` lives in word `i >> WORD_SHIFT` at position
//! `i & WORD_MASK`. Words are `u32`, least significant bit first, which is
//! the same layout as `BitVec<u32, Lsb0>`.

/// Word width in bits
pub const WORD_BITS: u32 = u32::BITS;

/// log2(WORD_BITS)
pub const WORD_SHIFT: u32 = WORD_BITS.trailing_zeros();

/// WORD_BITS - 1
pub const WORD_MASK: u32 = WORD_BITS - 1;

/// Location of a logical bit inside a packed word array
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitIndex {
    /// Index of the word holding the bit
    pub word: usize,
    /// Position of the bit inside that word
    pub bit: u32,
}

impl BitIndex {
    /// Split a flat offset into (word, bit)
    #[inline]
    pub fn of(offset: u32) -> Self {
        Self {
            word: (offset >> WORD_SHIFT) as usize,
            bit: offset & WORD_MASK,
        }
    }

    #[inline]
    pub fn mask(self) -> u32 {
        1 << self.bit
    }

    /// Set the bit. Never clears anything.
    #[inline]
    pub fn set(self, words: &mut [u32]) {
        words[self.word] |= self.mask();
    }

    #[inline]
    pub fn test(self, words: &[u32]) -> bool {
        words[self.word] & self.mask() != 0
    }
}

/// Number of words backing `total_bits` bits, with one spare word
pub fn words_for(total_bits: u32) -> usize {
    total_bits.div_ceil(WORD_BITS) as usize + 1
}
