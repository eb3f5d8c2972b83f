//! Tweakable PRFs keyed by wire labels, built on AES.
//!
//! `kdf128` schedules AES-128 from a single 16-byte label, `kdf256`
//! schedules AES-256 from two; both encrypt the tweak block. Callers that
//! work with truncated labels mask the output themselves.

use crate::block::Block;
use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes256};

/// PRF over a single-label key: `AES128_key(tweak)`.
#[inline]
pub fn kdf128(tweak: Block, key: Block) -> Block {
    let cipher = Aes128::new(&GenericArray::from(key.to_bytes()));
    let mut buf = GenericArray::from(tweak.to_bytes());
    cipher.encrypt_block(&mut buf);
    let out: [u8; 16] = buf.into();
    Block::from_bytes(out)
}

/// PRF over a double-label key: `AES256_(key_a ‖ key_b)(tweak)`.
#[inline]
pub fn kdf256(tweak: Block, keys: [Block; 2]) -> Block {
    let mut key_bytes = [0u8; 32];
    key_bytes[..16].copy_from_slice(&keys[0].to_bytes());
    key_bytes[16..].copy_from_slice(&keys[1].to_bytes());
    let cipher = Aes256::new(&GenericArray::from(key_bytes));
    let mut buf = GenericArray::from(tweak.to_bytes());
    cipher.encrypt_block(&mut buf);
    let out: [u8; 16] = buf.into();
    Block::from_bytes(out)
}
