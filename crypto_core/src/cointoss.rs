//! Commit-then-reveal coin toss producing a jointly random seed.
//!
//! Neither party can bias the result: each commits to its share before
//! seeing the other's, and the output is the XOR of both shares.

use rand::{CryptoRng, Rng};
use thiserror::Error;

use crate::{AbstractChannel, Block, Commitment};

#[derive(Debug, Error)]
pub enum CoinTossError {
    #[error("channel error during coin toss")]
    Io(#[from] std::io::Error),
    #[error("peer opened a value that does not match its commitment")]
    CommitmentMismatch,
}

pub struct CoinToss;

impl CoinToss {
    /// The committing side: commit first, open last.
    pub fn send<C: AbstractChannel, R: Rng + CryptoRng>(
        channel: &mut C,
        rng: &mut R,
    ) -> Result<Block, CoinTossError> {
        let share = rng.gen::<Block>();
        let r = rng.gen::<[u8; 16]>();

        let com = Commitment::commit(&share.to_bytes(), &r);
        channel.write_bytes(&com)?;
        channel.flush()?;

        // Peer's share arrives in the clear once our commitment is out.
        let peer_share = channel.read_block()?;

        channel.write_block(&share)?;
        channel.write_bytes(&r)?;
        channel.flush()?;

        Ok(share ^ peer_share)
    }

    /// The revealing side: receive the commitment, send a share, then
    /// check the opening.
    pub fn receive<C: AbstractChannel, R: Rng + CryptoRng>(
        channel: &mut C,
        rng: &mut R,
    ) -> Result<Block, CoinTossError> {
        let mut com = [0u8; 32];
        channel.read_bytes(&mut com)?;

        let share = rng.gen::<Block>();
        channel.write_block(&share)?;
        channel.flush()?;

        let peer_share = channel.read_block()?;
        let mut r = [0u8; 16];
        channel.read_bytes(&mut r)?;

        if !Commitment::check(&peer_share.to_bytes(), &r, &com) {
            return Err(CoinTossError::CommitmentMismatch);
        }

        Ok(share ^ peer_share)
    }
}
