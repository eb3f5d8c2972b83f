//! Running hash over the garbled-circuit byte stream.

use sha2::{Digest, Sha256};

/// Spill-buffer high-water mark; past this the buffer is absorbed into
/// the incremental hash and cleared.
pub const SPILL_BUFFER_SIZE: usize = 10 * 1024 * 1024;

/// Both parties feed this the per-gate bytes in gate order; equal digests
/// mean they saw the same circuit.
#[derive(Clone)]
pub struct RunningHash {
    hasher: Sha256,
    buf: Vec<u8>,
    chunked: bool,
}

impl RunningHash {
    pub fn new(chunked: bool) -> Self {
        Self {
            hasher: Sha256::new(),
            buf: Vec::with_capacity(SPILL_BUFFER_SIZE),
            chunked,
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
        if self.chunked && self.buf.len() > SPILL_BUFFER_SIZE {
            self.hasher.update(&self.buf);
            self.buf.clear();
        }
    }

    /// Absorb whatever is still buffered and return the digest. Safe to
    /// call more than once; later `update`s extend the stream.
    pub fn digest(&mut self) -> [u8; 32] {
        if !self.buf.is_empty() {
            self.hasher.update(&self.buf);
            self.buf.clear();
        }
        self.hasher.clone().finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunking_invisible() {
        let data: Vec<u8> = (0..4096u32).flat_map(|i| i.to_le_bytes()).collect();

        let mut whole = RunningHash::new(false);
        whole.update(&data);

        let mut pieces = RunningHash::new(true);
        for chunk in data.chunks(100) {
            pieces.update(chunk);
        }

        assert_eq!(whole.digest(), pieces.digest());
    }

    #[test]
    fn test_digest_idempotent() {
        let mut h = RunningHash::new(true);
        h.update(b"stream");
        let d = h.digest();
        assert_eq!(h.digest(), d);
    }

    #[test]
    fn test_sensitive_to_any_byte() {
        let mut a = RunningHash::new(true);
        a.update(b"stream-a");
        let mut b = RunningHash::new(true);
        b.update(b"stream-b");
        assert_ne!(a.digest(), b.digest());
    }
}
