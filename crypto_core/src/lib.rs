pub mod block;
pub mod channel;
pub mod cointoss;
pub mod commitment;
pub mod kdf;
pub mod prg;
pub mod rand_aes;
pub mod utils;

pub use crate::{
    block::Block,
    kdf::{kdf128, kdf256},
    prg::Prg,
    rand_aes::AesRng,
};

pub use channel::*;
pub use cointoss::*;
pub use commitment::*;
