//! Single-word bitboard for boards up to 10x10

/// One bit per cell, indexed by `Pos::to_index`.
/// A u128 covers the 100 cells of the largest board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Bitboard {
    bits: u128,
}

impl Bitboard {
    /// Create empty bitboard
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Bitboard with the lowest `cells` bits set
    pub const fn full(cells: usize) -> Self {
        if cells == 0 {
            Self { bits: 0 }
        } else {
            Self {
                bits: u128::MAX >> (128 - cells),
            }
        }
    }

    #[inline]
    pub fn set(&mut self, idx: usize) {
        self.bits |= 1u128 << idx;
    }

    #[inline]
    pub fn clear(&mut self, idx: usize) {
        self.bits &= !(1u128 << idx);
    }

    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        (self.bits >> idx) & 1 == 1
    }

    /// Count total set bits (popcount)
    #[inline]
    pub fn count(&self) -> u32 {
        self.bits.count_ones()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    #[inline]
    pub fn union(self, other: Bitboard) -> Bitboard {
        Bitboard {
            bits: self.bits | other.bits,
        }
    }

    /// Bits set in `self` but not in `other`
    #[inline]
    pub fn without(self, other: Bitboard) -> Bitboard {
        Bitboard {
            bits: self.bits & !other.bits,
        }
    }

    /// Iterate over set bit indices in ascending order
    pub fn iter_ones(&self) -> BitboardIter {
        BitboardIter { bits: self.bits }
    }
}

/// Iterator over set bits in a Bitboard
pub struct BitboardIter {
    bits: u128,
}

impl Iterator for BitboardIter {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let idx = self.bits.trailing_zeros() as usize;
        // Clear the bit we just found
        self.bits &= self.bits - 1;
        Some(idx)
    }
}
