//! Hash-based commitments.
//!
//! Two forms are used: the full-width `commit`/`check` pair for the coin
//! toss, and `commit_k`, the truncated digest that commits to a
//! decommitment string in the garbled-circuit stream.

use sha2::{Digest, Sha256};

pub struct Commitment;

impl Commitment {
    /// Commit to `input` under randomness `r`.
    pub fn commit(input: &[u8], r: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(input);
        hasher.update(r);

        let mut res = [0u8; 32];
        res.copy_from_slice(&hasher.finalize());
        res
    }

    /// Open and check a commitment.
    pub fn check(input: &[u8], r: &[u8], com: &[u8; 32]) -> bool {
        Self::commit(input, r) == *com
    }

    /// A `k`-bit digest of `data`: the first `⌈k/8⌉` bytes of SHA-256,
    /// spare bits of the last byte cleared.
    pub fn commit_k(data: &[u8], k: usize) -> Vec<u8> {
        let digest = Sha256::digest(data);
        let nbytes = (k + 7) / 8;
        let mut out = digest[..nbytes].to_vec();
        let rem = k % 8;
        if rem != 0 {
            out[nbytes - 1] &= (1u8 << rem) - 1;
        }
        out
    }
}
