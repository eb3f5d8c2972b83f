//! Decommitment strings for generator-input wires.
//!
//! A decommitment is `label ‖ salt`, each `⌈k/8⌉` bytes; its commitment
//! is the k-bit hash that travels in the gate stream. Input-binding rows
//! XOR whole decommitments together, salts included.

use crypto_core::{utils::xor_inplace, Block, Commitment};

use crate::label;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decommit {
    bytes: Vec<u8>,
}

impl Decommit {
    pub fn new(label: Block, salt: &[u8], key_bytes: usize) -> Self {
        let mut bytes = Vec::with_capacity(2 * key_bytes);
        bytes.extend_from_slice(&label.to_bytes()[..key_bytes]);
        bytes.extend_from_slice(salt);
        Self { bytes }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// An all-zero string of the given length, the XOR-fold identity.
    pub fn zeroed(len: usize) -> Self {
        Self {
            bytes: vec![0u8; len],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn xor_assign(&mut self, other: &Decommit) {
        xor_inplace(&mut self.bytes, &other.bytes);
    }

    /// The label part, zero-extended to a block.
    pub fn label(&self, key_bytes: usize) -> Block {
        label::read_label(&self.bytes[..key_bytes])
    }

    pub fn lsb(&self) -> bool {
        self.bytes[0] & 1 == 1
    }

    /// The k-bit commitment to this decommitment.
    pub fn commit(&self, k: usize) -> Vec<u8> {
        Commitment::commit_k(&self.bytes, k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let label = Block::new(0xaa01);
        let salt = [7u8; 10];
        let d = Decommit::new(label, &salt, 10);
        assert_eq!(d.len(), 20);
        assert_eq!(d.label(10), label);
        assert_eq!(&d.as_bytes()[10..], &salt);
        assert!(d.lsb());
    }

    #[test]
    fn test_xor_fold() {
        let a = Decommit::new(Block::new(0b1100), &[1u8; 10], 10);
        let b = Decommit::new(Block::new(0b1010), &[2u8; 10], 10);
        let mut acc = Decommit::zeroed(20);
        acc.xor_assign(&a);
        acc.xor_assign(&b);
        assert_eq!(acc.label(10), Block::new(0b0110));
        assert_eq!(&acc.as_bytes()[10..], &[3u8; 10]);

        acc.xor_assign(&b);
        assert_eq!(acc, {
            let mut c = Decommit::zeroed(20);
            c.xor_assign(&a);
            c
        });
    }

    #[test]
    fn test_commit_binds() {
        let a = Decommit::new(Block::new(1), &[0u8; 10], 10);
        let b = Decommit::new(Block::new(2), &[0u8; 10], 10);
        assert_eq!(a.commit(80).len(), 10);
        assert_ne!(a.commit(80), b.commit(80));
        assert_eq!(a.commit(80), a.commit(80));
    }
}
