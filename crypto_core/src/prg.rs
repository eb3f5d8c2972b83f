//! One-shot expansion of a seed into pseudorandom blocks or bytes.

use rand::{Rng, RngCore, SeedableRng};

use crate::{AesRng, Block};

pub struct Prg;

impl Prg {
    /// Expand `seed` into `num` blocks.
    pub fn gen_from_seed(seed: Block, num: usize) -> Vec<Block> {
        let mut rng = AesRng::from_seed(seed);
        (0..num).map(|_| rng.gen::<Block>()).collect()
    }

    /// Expand `seed` into `num` bytes.
    pub fn gen_bytes_from_seed(seed: Block, num: usize) -> Vec<u8> {
        let mut rng = AesRng::from_seed(seed);
        let mut out = vec![0u8; num];
        rng.fill_bytes(&mut out);
        out
    }
}
