//! Two-party driver for one circuit instance over a byte channel.
//!
//! Streams the garbled circuit gate by gate, delivers decommitments and
//! evaluator-input keys, runs the jointly sampled input-binding rows and
//! cross-checks commitments and circuit digests. The evaluator-input key
//! transfer is a plain send standing in for the external oblivious
//! transfer; it leaks the choice bits and is only suitable for tests and
//! demos.

use circuit::{Circuit, GateKind};
use crypto_core::{
    utils::{bit_at, set_bit, xor},
    AbstractChannel, AesRng, Block, CoinToss, CoinTossError, Prg,
};
use rand::{CryptoRng, Rng};
use thiserror::Error;
use tracing::debug;

use crate::{
    config::GarbleConfig,
    decommit::Decommit,
    errors::{EvaluatorError, GeneratorError},
    evaluator::Evaluator,
    generator::Garbler,
};

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    CoinToss(#[from] CoinTossError),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error(transparent)]
    Evaluator(#[from] EvaluatorError),
    #[error("decommitments do not match the committed inputs")]
    CommitmentCheckFailed,
    #[error("circuit digests disagree")]
    DigestMismatch,
}

/// What the generator learns from one instance.
#[derive(Debug)]
pub struct GeneratorOutcome {
    /// Generator-output bits, decoded by the peer and shipped back.
    pub gen_out: Vec<u8>,
    /// Digest of the garbled stream this side produced.
    pub digest: [u8; 32],
    /// Binding bits this side expects the peer to have recovered.
    pub gen_input_hash: Vec<u8>,
}

/// What the evaluator learns from one instance.
#[derive(Debug)]
pub struct EvaluatorOutcome {
    pub evl_out: Vec<u8>,
    pub gen_out: Vec<u8>,
    /// Binding bits recovered from the generator-input rows.
    pub gen_input_hash: Vec<u8>,
    /// Digest of the garbled stream this side consumed.
    pub digest: [u8; 32],
}

pub struct TwoPartyGarbling<C: AbstractChannel> {
    channel: C,
    cfg: GarbleConfig,
}

impl<C: AbstractChannel> TwoPartyGarbling<C> {
    pub fn new(channel: C, cfg: GarbleConfig) -> Self {
        Self { channel, cfg }
    }

    pub fn into_channel(self) -> C {
        self.channel
    }

    /// Derive the jointly sampled binding rows from a tossed seed.
    fn binding_rows(seed: Block, rows: usize, gen_inp_cnt: usize) -> Vec<Vec<u8>> {
        let row_bytes = (gen_inp_cnt + 7) / 8;
        let bytes = Prg::gen_bytes_from_seed(seed, rows * row_bytes);
        bytes.chunks(row_bytes.max(1)).take(rows).map(|c| c.to_vec()).collect()
    }

    /// Run the generator side of one instance.
    pub fn run_generator<R: Rng + CryptoRng>(
        &mut self,
        circ: &Circuit,
        gen_inp: &[u8],
        rows: usize,
        rng: &mut R,
    ) -> Result<GeneratorOutcome, ProtocolError> {
        assert!(rows <= 8 * self.cfg.key_bytes(), "too many binding rows");
        let mask_len = (circ.gen_inp_cnt + 7) / 8;
        assert!(
            gen_inp.len() >= mask_len,
            "generator input shorter than the circuit input"
        );

        let seed = CoinToss::send(&mut self.channel, rng)?;
        let row_vecs = Self::binding_rows(seed, rows, circ.gen_inp_cnt);

        // OT stand-in: learn the peer's choice bits, return one key per
        // evaluator-input wire.
        let choice_bits = self.channel.read_vec()?;
        let ot_pairs: Vec<Block> = (0..2 * circ.evl_inp_cnt).map(|_| rng.gen()).collect();
        let mask: Vec<u8> = (0..mask_len).map(|_| rng.gen()).collect();
        let masked = xor(&mask, &gen_inp[..mask_len]);

        self.channel.write_vec(&masked)?;
        for i in 0..circ.evl_inp_cnt {
            let b = bit_at(&choice_bits, i) as usize;
            self.channel.write_block(&ot_pairs[2 * i + b])?;
        }
        self.channel.flush()?;

        let mut garbler = Garbler::with_hashing(self.cfg, circ, &ot_pairs, mask, rng.gen());

        let mut gen_wire = 0usize;
        for gate in circ.gates.iter() {
            let bytes = garbler.next_gate_hashed(gate)?.to_vec();
            self.channel.write_vec(&bytes)?;
            if gate.kind == GateKind::GenInput {
                let side = bit_at(&masked, gen_wire) as usize;
                let decom = &garbler.decommitments()[2 * gen_wire + side];
                self.channel.write_vec(decom.as_bytes())?;
                gen_wire += 1;
            }
            self.channel.flush()?;
        }
        debug!(gates = circ.gates.len(), "garbled stream sent");

        for (kx, row) in row_vecs.iter().enumerate() {
            let bytes = garbler.bind_gen_input(row, kx as u64).to_vec();
            self.channel.write_bytes(&bytes)?;
        }
        self.channel.flush()?;
        debug!(rows, "binding rows sent");

        let digest = garbler.digest().expect("hashing enabled");
        self.channel.write_bytes(&digest)?;
        self.channel.flush()?;

        let commitments_ok = self.channel.read_bool()?;
        let digest_ok = self.channel.read_bool()?;
        let gen_out = self.channel.read_vec()?;
        if !commitments_ok {
            return Err(ProtocolError::CommitmentCheckFailed);
        }
        if !digest_ok {
            return Err(ProtocolError::DigestMismatch);
        }

        // The binding bits the peer must have seen: row-wise parities of
        // the true input.
        let mut gen_input_hash = vec![0u8; self.cfg.key_bytes()];
        for (kx, row) in row_vecs.iter().enumerate() {
            let mut parity = false;
            for j in 0..circ.gen_inp_cnt {
                if bit_at(row, j) && bit_at(gen_inp, j) {
                    parity = !parity;
                }
            }
            set_bit(&mut gen_input_hash, kx, parity);
        }

        Ok(GeneratorOutcome {
            gen_out,
            digest,
            gen_input_hash,
        })
    }

    /// Run the evaluator side of one instance.
    pub fn run_evaluator(
        &mut self,
        circ: &Circuit,
        evl_inp: &[u8],
        rows: usize,
    ) -> Result<EvaluatorOutcome, ProtocolError> {
        assert!(rows <= 8 * self.cfg.key_bytes(), "too many binding rows");
        let kbytes = self.cfg.key_bytes();

        let mut rng = AesRng::new();
        let seed = CoinToss::receive(&mut self.channel, &mut rng)?;
        let row_vecs = Self::binding_rows(seed, rows, circ.gen_inp_cnt);

        let inp_len = (circ.evl_inp_cnt + 7) / 8;
        assert!(
            evl_inp.len() >= inp_len,
            "evaluator input shorter than the circuit input"
        );
        self.channel.write_vec(&evl_inp[..inp_len])?;
        self.channel.flush()?;

        let masked = self.channel.read_vec()?;
        let mut ot_keys = Vec::with_capacity(circ.evl_inp_cnt);
        for _ in 0..circ.evl_inp_cnt {
            ot_keys.push(self.channel.read_block()?);
        }

        let mut evaluator =
            Evaluator::new(self.cfg, circ, &ot_keys, masked, evl_inp[..inp_len].to_vec());

        let mut gen_wire = 0usize;
        for gate in circ.gates.iter() {
            let bytes = self.channel.read_vec()?;
            if gate.kind == GateKind::GenInput {
                let decom = self.channel.read_vec()?;
                evaluator.provide_gen_inp_decom(gen_wire, Decommit::from_bytes(decom));
                gen_wire += 1;
            }
            evaluator.next_gate(gate, &bytes)?;
        }
        debug!(gates = circ.gates.len(), "garbled stream consumed");

        let mut row_buf = vec![0u8; 2 * kbytes];
        for (kx, row) in row_vecs.iter().enumerate() {
            self.channel.read_bytes(&mut row_buf)?;
            evaluator.bind_gen_input(row, kx as u64, &row_buf)?;
        }

        let mut peer_digest = [0u8; 32];
        self.channel.read_bytes(&mut peer_digest)?;

        let commitments_ok = evaluator.check_commitments();
        let digest = evaluator.digest();
        let digest_ok = digest == peer_digest;
        debug!(commitments_ok, digest_ok, "instance checks");

        self.channel.write_bool(commitments_ok)?;
        self.channel.write_bool(digest_ok)?;
        self.channel.write_vec(evaluator.gen_out())?;
        self.channel.flush()?;

        if !commitments_ok {
            return Err(ProtocolError::CommitmentCheckFailed);
        }
        if !digest_ok {
            return Err(ProtocolError::DigestMismatch);
        }

        Ok(EvaluatorOutcome {
            evl_out: evaluator.evl_out().to_vec(),
            gen_out: evaluator.gen_out().to_vec(),
            gen_input_hash: evaluator.gen_input_hash().to_vec(),
            digest,
        })
    }
}
