use crypto_core::Block;

/// Engine configuration, carried by value. Both parties must construct
/// identical configs or the byte stream silently stops lining up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GarbleConfig {
    /// Security parameter in bits; labels keep their low `k` bits.
    pub k: usize,
    /// XOR-shaped gates cost nothing on the wire.
    pub free_xor: bool,
    /// Garbled row reduction: the canonical zero row is omitted.
    pub grr: bool,
    /// Absorb the running-hash spill buffer in chunks once it passes
    /// [`crate::hash::SPILL_BUFFER_SIZE`].
    pub chunked_hash: bool,
}

impl GarbleConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            free_xor: true,
            grr: true,
            chunked_hash: true,
        }
    }

    /// Bytes per emitted label: `⌈k/8⌉`.
    #[inline]
    pub fn key_bytes(&self) -> usize {
        (self.k + 7) / 8
    }

    /// Mask with exactly the low `k` bits set; applied after every KDF
    /// call and to every sampled label.
    #[inline]
    pub fn clear_mask(&self) -> Block {
        Block::mask_lo(self.k)
    }
}

impl Default for GarbleConfig {
    fn default() -> Self {
        Self::new(80)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bytes() {
        assert_eq!(GarbleConfig::new(80).key_bytes(), 10);
        assert_eq!(GarbleConfig::new(128).key_bytes(), 16);
        assert_eq!(GarbleConfig::new(81).key_bytes(), 11);
    }

    #[test]
    fn test_clear_mask() {
        let cfg = GarbleConfig::new(80);
        assert_eq!(cfg.clear_mask(), Block::new((1u128 << 80) - 1));
        assert_eq!(GarbleConfig::new(128).clear_mask(), Block::ONES);
    }
}
