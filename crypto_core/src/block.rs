//! 128-bit blocks, the unit of wire labels, cipher inputs and PRG output.

use core::fmt;
use core::ops::{BitAnd, BitXor, BitXorAssign};
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};

/// A 128-bit value. Byte conversions are little-endian, so the low bit of
/// the integer is bit 0 of the first byte.
#[repr(transparent)]
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Block(u128);

unsafe impl bytemuck::Zeroable for Block {}
unsafe impl bytemuck::Pod for Block {}

impl Block {
    pub const LEN: usize = 16;
    pub const ZERO: Self = Self(0);
    pub const ONES: Self = Self(u128::MAX);

    #[inline]
    pub fn new(b: u128) -> Self {
        Self(b)
    }

    #[inline]
    pub fn inner(&self) -> u128 {
        self.0
    }

    /// The point-and-permute bit.
    #[inline]
    pub fn lsb(&self) -> bool {
        self.0 & 1 == 1
    }

    #[inline]
    pub fn set_lsb(self) -> Self {
        Self(self.0 | 1)
    }

    #[inline]
    pub fn clear_lsb(self) -> Self {
        Self(self.0 & !1)
    }

    /// A block with exactly the low `k` bits set.
    #[inline]
    pub fn mask_lo(k: usize) -> Self {
        if k >= 128 {
            Self::ONES
        } else {
            Self((1u128 << k) - 1)
        }
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; 16] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(u128::from_le_bytes(bytes))
    }

    /// Read a block from a slice of exactly 16 bytes.
    #[inline]
    pub fn try_from_slice(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; 16] = bytes.try_into().ok()?;
        Some(Self::from_bytes(bytes))
    }
}

impl From<u128> for Block {
    #[inline]
    fn from(b: u128) -> Self {
        Self(b)
    }
}

impl From<[u8; 16]> for Block {
    #[inline]
    fn from(bytes: [u8; 16]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Block> for [u8; 16] {
    #[inline]
    fn from(b: Block) -> Self {
        b.to_bytes()
    }
}

impl AsRef<[u8]> for Block {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl AsMut<[u8]> for Block {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        bytemuck::bytes_of_mut(self)
    }
}

impl BitXor for Block {
    type Output = Self;

    #[inline]
    fn bitxor(self, other: Self) -> Self::Output {
        Self(self.0 ^ other.0)
    }
}

impl BitXorAssign for Block {
    #[inline]
    fn bitxor_assign(&mut self, other: Self) {
        self.0 ^= other.0;
    }
}

impl BitAnd for Block {
    type Output = Self;

    #[inline]
    fn bitand(self, other: Self) -> Self::Output {
        Self(self.0 & other.0)
    }
}

impl Distribution<Block> for Standard {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Block {
        Block::new(rng.gen())
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({:032x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lsb() {
        assert!(!Block::new(0).lsb());
        assert!(Block::new(1).lsb());
        assert!(!Block::new(2).lsb());
        assert!(Block::new(3).lsb());
    }

    #[test]
    fn test_set_clear_lsb() {
        assert_eq!(Block::new(2).set_lsb(), Block::new(3));
        assert_eq!(Block::new(3).set_lsb(), Block::new(3));
        assert_eq!(Block::new(3).clear_lsb(), Block::new(2));
        assert_eq!(Block::new(2).clear_lsb(), Block::new(2));
    }

    #[test]
    fn test_mask_lo() {
        assert_eq!(Block::mask_lo(128), Block::ONES);
        assert_eq!(Block::mask_lo(0), Block::ZERO);
        assert_eq!(Block::mask_lo(80), Block::new((1u128 << 80) - 1));
    }

    #[test]
    fn test_bytes_roundtrip() {
        let b = Block::new(0x0123_4567_89ab_cdef_0011_2233_4455_6677);
        assert_eq!(Block::from_bytes(b.to_bytes()), b);
        assert_eq!(Block::try_from_slice(&b.to_bytes()), Some(b));
        assert_eq!(Block::try_from_slice(&[0u8; 15]), None);
        // Little-endian: bit 0 lives in the first byte.
        assert_eq!(Block::new(1).to_bytes()[0], 1);
    }

    #[test]
    fn test_xor_and() {
        let a = Block::new(0b1100);
        let b = Block::new(0b1010);
        assert_eq!(a ^ b, Block::new(0b0110));
        assert_eq!(a & b, Block::new(0b1000));
        let mut c = a;
        c ^= b;
        assert_eq!(c, Block::new(0b0110));
    }
}
