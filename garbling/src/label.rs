//! Label arithmetic shared by the generator and evaluator kernels.

use crypto_core::{kdf128, kdf256, Block};
use rand::{CryptoRng, Rng};

/// Tweak for gate `ix`: both 64-bit halves hold the index.
#[inline]
pub fn gate_tweak(ix: u64) -> Block {
    Block::new(((ix as u128) << 64) | ix as u128)
}

/// Single-key PRF masked to the label width.
#[inline]
pub fn prf1(tweak: Block, key: Block, mask: Block) -> Block {
    kdf128(tweak, key) & mask
}

/// Double-key PRF masked to the label width.
#[inline]
pub fn prf2(tweak: Block, keys: [Block; 2], mask: Block) -> Block {
    kdf256(tweak, keys) & mask
}

/// `k` fresh random bits, zero-extended to a block.
#[inline]
pub fn random_label<R: Rng + CryptoRng>(rng: &mut R, k: usize) -> Block {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes[..(k + 7) / 8]);
    Block::from_bytes(bytes) & Block::mask_lo(k)
}

/// Append the low `key_bytes` bytes of a label.
#[inline]
pub fn push_label(buf: &mut Vec<u8>, label: Block, key_bytes: usize) {
    buf.extend_from_slice(&label.to_bytes()[..key_bytes]);
}

/// Zero-extend up to 16 emitted bytes back into a block.
#[inline]
pub fn read_label(bytes: &[u8]) -> Block {
    let mut out = [0u8; 16];
    out[..bytes.len()].copy_from_slice(bytes);
    Block::from_bytes(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypto_core::AesRng;
    use rand::SeedableRng;

    #[test]
    fn test_gate_tweak_broadcasts() {
        let t = gate_tweak(0x0102_0304);
        let bytes = t.to_bytes();
        assert_eq!(bytes[..8], bytes[8..]);
        assert_eq!(&bytes[..4], &[0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_random_label_masked() {
        let mut rng = AesRng::from_seed(Block::new(5));
        for _ in 0..50 {
            let l = random_label(&mut rng, 80);
            assert_eq!(l & Block::mask_lo(80), l);
        }
    }

    #[test]
    fn test_label_bytes_roundtrip() {
        let mut rng = AesRng::from_seed(Block::new(6));
        let l = random_label(&mut rng, 80);
        let mut buf = Vec::new();
        push_label(&mut buf, l, 10);
        assert_eq!(buf.len(), 10);
        assert_eq!(read_label(&buf), l);
    }

    #[test]
    fn test_prf_masked() {
        let mask = Block::mask_lo(80);
        let c = prf1(gate_tweak(3), Block::new(77), mask);
        assert_eq!(c & mask, c);
        let c = prf2(gate_tweak(3), [Block::new(77), Block::new(78)], mask);
        assert_eq!(c & mask, c);
    }
}
