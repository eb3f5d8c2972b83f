//! Generator-side streaming engine.
//!
//! One instance garbles one circuit. Gates arrive in topological order
//! through [`Garbler::next_gate`]; each call returns the bytes the
//! evaluator must consume for that gate. All randomness is drawn from a
//! single seeded PRG, so a revealed seed lets the evaluator regenerate
//! the instance byte for byte.

use circuit::{Circuit, Gate, GateKind, TABLE_IDENT, TABLE_NOT, TABLE_XOR};
use crypto_core::{utils::bit_at, AesRng, Block};
use rand::{RngCore, SeedableRng};

use crate::{
    config::GarbleConfig, decommit::Decommit, errors::GeneratorError, hash::RunningHash, label,
};

pub struct Garbler<'a> {
    cfg: GarbleConfig,
    clear_mask: Block,
    rng: AesRng,
    /// Global offset; the one-label of every wire is `zero ⊕ r`.
    r: Block,
    /// Zero label per wire id.
    wires: Vec<Block>,
    /// Key pairs from the OT subprotocol, two per evaluator-input wire.
    ot_keys: &'a [Block],
    /// Mask bit per generator-input wire; selects the decommitment pair
    /// ordering.
    inp_mask: Vec<u8>,
    /// Decommitment pair per generator-input wire, indexed `2·i + side`.
    decom: Vec<Decommit>,
    out_buf: Vec<u8>,
    hash: Option<RunningHash>,
    gate_ix: u64,
    gen_inp_ix: usize,
    evl_inp_ix: usize,
}

impl<'a> Garbler<'a> {
    /// Set up one circuit instance. `ot_keys` holds the pair
    /// `[2i, 2i+1]` for evaluator-input wire `i`; `gen_inp_mask` is an
    /// LSB-first bit string covering every generator-input wire.
    pub fn new(
        cfg: GarbleConfig,
        circ: &Circuit,
        ot_keys: &'a [Block],
        gen_inp_mask: Vec<u8>,
        seed: Block,
    ) -> Self {
        assert!(
            gen_inp_mask.len() * 8 >= circ.gen_inp_cnt,
            "input mask shorter than the generator input"
        );

        let mut rng = AesRng::from_seed(seed);
        let r = label::random_label(&mut rng, cfg.k).set_lsb();

        Self {
            cfg,
            clear_mask: cfg.clear_mask(),
            rng,
            r,
            wires: vec![Block::ZERO; circ.wire_count],
            ot_keys,
            inp_mask: gen_inp_mask,
            decom: vec![Decommit::default(); 2 * circ.gen_inp_cnt],
            out_buf: Vec::new(),
            hash: None,
            gate_ix: 0,
            gen_inp_ix: 0,
            evl_inp_ix: 0,
        }
    }

    /// Like [`Garbler::new`], but also folds everything emitted through
    /// [`Garbler::next_gate_hashed`] into a running hash.
    pub fn with_hashing(
        cfg: GarbleConfig,
        circ: &Circuit,
        ot_keys: &'a [Block],
        gen_inp_mask: Vec<u8>,
        seed: Block,
    ) -> Self {
        let mut garbler = Self::new(cfg, circ, ot_keys, gen_inp_mask, seed);
        garbler.hash = Some(RunningHash::new(cfg.chunked_hash));
        garbler
    }

    /// Garble one gate and return its stream bytes.
    pub fn next_gate(&mut self, gate: &Gate) -> Result<&[u8], GeneratorError> {
        self.out_buf.clear();

        let zero = match gate.kind {
            GateKind::GenInput => self.garble_gen_input()?,
            GateKind::EvlInput => self.garble_evl_input()?,
            _ => {
                let zero = match gate.arity() {
                    2 => self.garble_binary(gate),
                    1 => self.garble_unary(gate),
                    arity => {
                        return Err(GeneratorError::InvalidArity {
                            gate: gate.id,
                            arity,
                        })
                    }
                };
                match gate.kind {
                    GateKind::EvlOutput => self.push_evl_output_tag(zero),
                    GateKind::GenOutput => self.push_gen_output_tag(zero),
                    _ => {}
                }
                zero
            }
        };

        self.wires[gate.id] = zero;
        self.gate_ix += 1;
        Ok(&self.out_buf)
    }

    /// Garble one gate, folding its bytes into the running hash.
    pub fn next_gate_hashed(&mut self, gate: &Gate) -> Result<&[u8], GeneratorError> {
        let _ = self.next_gate(gate)?;
        if let Some(hash) = &mut self.hash {
            hash.update(&self.out_buf);
        }
        Ok(&self.out_buf)
    }

    fn garble_gen_input(&mut self) -> Result<Block, GeneratorError> {
        let kbytes = self.cfg.key_bytes();
        if 2 * self.gen_inp_ix + 1 >= self.decom.len() {
            return Err(GeneratorError::MaskExhausted {
                wire: self.gen_inp_ix,
            });
        }

        let zero = label::random_label(&mut self.rng, self.cfg.k);
        let pair = [zero, zero ^ self.r];
        let m = bit_at(&self.inp_mask, self.gen_inp_ix) as usize;

        // The slot-0 decommitment holds the label of the mask bit.
        let mut salt = vec![0u8; kbytes];
        self.rng.fill_bytes(&mut salt);
        let d0 = Decommit::new(pair[m], &salt, kbytes);
        self.rng.fill_bytes(&mut salt);
        let d1 = Decommit::new(pair[1 - m], &salt, kbytes);

        self.out_buf.extend_from_slice(&d0.commit(self.cfg.k));
        self.out_buf.extend_from_slice(&d1.commit(self.cfg.k));

        self.decom[2 * self.gen_inp_ix] = d0;
        self.decom[2 * self.gen_inp_ix + 1] = d1;
        self.gen_inp_ix += 1;
        Ok(zero)
    }

    fn garble_evl_input(&mut self) -> Result<Block, GeneratorError> {
        let kbytes = self.cfg.key_bytes();
        let ix = 2 * self.evl_inp_ix;
        let keys = self
            .ot_keys
            .get(ix..ix + 2)
            .ok_or(GeneratorError::MissingOtKeys {
                wire: self.evl_inp_ix,
            })?;

        let zero = label::random_label(&mut self.rng, self.cfg.k);
        label::push_label(
            &mut self.out_buf,
            (keys[0] & self.clear_mask) ^ zero,
            kbytes,
        );
        label::push_label(
            &mut self.out_buf,
            (keys[1] & self.clear_mask) ^ zero ^ self.r,
            kbytes,
        );

        self.evl_inp_ix += 1;
        Ok(zero)
    }

    fn garble_binary(&mut self, gate: &Gate) -> Block {
        let x0 = self.wires[gate.inputs[0]];
        let y0 = self.wires[gate.inputs[1]];

        if self.cfg.free_xor && gate.table == TABLE_XOR {
            return x0 ^ y0;
        }

        let kbytes = self.cfg.key_bytes();
        let tweak = label::gate_tweak(self.gate_ix);
        let x = [x0, x0 ^ self.r];
        let y = [y0, y0 ^ self.r];
        let px = x0.lsb() as u8;
        let py = y0.lsb() as u8;
        // Row index whose key pair carries select bits (0, 0).
        let degarbled = ((py << 1) | px) as usize;

        let mut key_x = x[px as usize];
        let mut key_y = y[py as usize];

        let cipher = label::prf2(tweak, [key_x, key_y], self.clear_mask);
        let bit = gate.table_bit(degarbled as u8) as usize;

        let mut z = [Block::ZERO; 2];
        if self.cfg.grr {
            // The zero row defines the output labels and is never sent.
            z[bit] = cipher;
            z[1 - bit] = cipher ^ self.r;
        } else {
            z[0] = label::random_label(&mut self.rng, self.cfg.k);
            z[1] = z[0] ^ self.r;
            label::push_label(&mut self.out_buf, cipher ^ z[bit], kbytes);
        }

        // Remaining rows in fixed order: (¬px, py), (px, ¬py), (¬px, ¬py).
        for row in 1u8..4 {
            key_x = key_x ^ self.r;
            if row == 2 {
                key_y = key_y ^ self.r;
            }
            let cipher = label::prf2(tweak, [key_x, key_y], self.clear_mask);
            let bit = gate.table_bit(row ^ degarbled as u8) as usize;
            label::push_label(&mut self.out_buf, cipher ^ z[bit], kbytes);
        }

        z[0]
    }

    fn garble_unary(&mut self, gate: &Gate) -> Block {
        let x0 = self.wires[gate.inputs[0]];

        if self.cfg.free_xor {
            match gate.table {
                TABLE_IDENT => return x0,
                TABLE_NOT => return x0 ^ self.r,
                _ => {}
            }
        }

        let kbytes = self.cfg.key_bytes();
        let tweak = label::gate_tweak(self.gate_ix);
        let x = [x0, x0 ^ self.r];
        let px = x0.lsb() as u8;

        let mut key = x[px as usize];
        let cipher = label::prf1(tweak, key, self.clear_mask);
        let bit = gate.table_bit(px) as usize;

        let mut z = [Block::ZERO; 2];
        if self.cfg.grr {
            z[bit] = cipher;
            z[1 - bit] = cipher ^ self.r;
        } else {
            z[0] = label::random_label(&mut self.rng, self.cfg.k);
            z[1] = z[0] ^ self.r;
            label::push_label(&mut self.out_buf, cipher ^ z[bit], kbytes);
        }

        key = key ^ self.r;
        let cipher = label::prf1(tweak, key, self.clear_mask);
        let bit = gate.table_bit(1 ^ px) as usize;
        label::push_label(&mut self.out_buf, cipher ^ z[bit], kbytes);

        z[0]
    }

    fn push_evl_output_tag(&mut self, zero: Block) {
        self.out_buf.push(zero.lsb() as u8);
    }

    fn push_gen_output_tag(&mut self, zero: Block) {
        self.out_buf.push(zero.lsb() as u8);
    }

    /// Emit one generator-input binding row: a garbled encoding of the
    /// parity `⊕_{row[j]=1} input[j]`, keyed by the folded decommitments.
    pub fn bind_gen_input(&mut self, row: &[u8], row_ix: u64) -> &[u8] {
        self.out_buf.clear();
        let kbytes = self.cfg.key_bytes();

        let out0 = label::random_label(&mut self.rng, self.cfg.k).clear_lsb();
        let out = [out0, out0 ^ self.r];

        let mut msg = Decommit::zeroed(2 * kbytes);
        for j in 0..self.decom.len() / 2 {
            if bit_at(row, j) {
                let side = bit_at(&self.inp_mask, j) as usize;
                msg.xor_assign(&self.decom[2 * j + side]);
            }
        }

        let tweak = label::gate_tweak(row_ix);
        let in0 = msg.label(kbytes);
        let in_keys = [in0, in0 ^ self.r];

        let enc = [
            out[0] ^ label::prf1(tweak, in_keys[0], self.clear_mask),
            out[1] ^ label::prf1(tweak, in_keys[1], self.clear_mask),
        ];

        // The side whose select bit matches the folded message goes first.
        let first = msg.lsb() as usize;
        label::push_label(&mut self.out_buf, enc[first], kbytes);
        label::push_label(&mut self.out_buf, enc[1 - first], kbytes);

        &self.out_buf
    }

    /// Decommitment pair for generator-input wire `i`, slot `2i + side`.
    pub fn decommitments(&self) -> &[Decommit] {
        &self.decom
    }

    /// The global offset of this instance.
    pub fn delta(&self) -> Block {
        self.r
    }

    /// Zero label currently stored for `wire`.
    pub fn zero_label(&self, wire: usize) -> Block {
        self.wires[wire]
    }

    pub fn config(&self) -> GarbleConfig {
        self.cfg
    }

    /// Digest of everything folded so far; `None` unless constructed
    /// with hashing.
    pub fn digest(&mut self) -> Option<[u8; 32]> {
        self.hash.as_mut().map(|h| h.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuit::TABLE_AND;

    fn and_circuit() -> Circuit {
        let mut circ = Circuit::new(3);
        circ.push(Gate::gen_input(0));
        circ.push(Gate::gen_input(1));
        circ.push(Gate::binary(2, GateKind::EvlOutput, TABLE_AND, 0, 1));
        circ
    }

    fn run_all(garbler: &mut Garbler<'_>, circ: &Circuit) -> Vec<Vec<u8>> {
        circ.gates
            .iter()
            .map(|g| garbler.next_gate(g).unwrap().to_vec())
            .collect()
    }

    #[test]
    fn test_offset_lsb_is_one() {
        let circ = and_circuit();
        let garbler = Garbler::new(GarbleConfig::new(80), &circ, &[], vec![0u8], Block::new(1));
        assert!(garbler.delta().lsb());
        assert_eq!(garbler.delta() & Block::mask_lo(80), garbler.delta());
    }

    #[test]
    fn test_emitted_sizes_grr() {
        let circ = and_circuit();
        let mut garbler =
            Garbler::new(GarbleConfig::new(80), &circ, &[], vec![0b10u8], Block::new(2));
        let chunks = run_all(&mut garbler, &circ);
        // Two generator inputs at 2K each, one AND at 3K plus a tag byte.
        assert_eq!(chunks[0].len(), 20);
        assert_eq!(chunks[1].len(), 20);
        assert_eq!(chunks[2].len(), 31);
    }

    #[test]
    fn test_emitted_sizes_no_grr() {
        let circ = and_circuit();
        let mut cfg = GarbleConfig::new(80);
        cfg.grr = false;
        let mut garbler = Garbler::new(cfg, &circ, &[], vec![0u8], Block::new(2));
        let chunks = run_all(&mut garbler, &circ);
        assert_eq!(chunks[2].len(), 41);
    }

    #[test]
    fn test_xor_costs_nothing() {
        let mut circ = Circuit::new(3);
        circ.push(Gate::gen_input(0));
        circ.push(Gate::gen_input(1));
        circ.push(Gate::binary(2, GateKind::Internal, TABLE_XOR, 0, 1));
        let mut garbler =
            Garbler::new(GarbleConfig::new(80), &circ, &[], vec![0u8], Block::new(3));
        let chunks = run_all(&mut garbler, &circ);
        assert_eq!(chunks[2].len(), 0);
        // Free-XOR output label is the XOR of the input labels.
        assert_eq!(
            garbler.zero_label(2),
            garbler.zero_label(0) ^ garbler.zero_label(1)
        );
    }

    #[test]
    fn test_unary_sizes() {
        let mut circ = Circuit::new(2);
        circ.push(Gate::gen_input(0));
        circ.push(Gate::unary(1, GateKind::Internal, TABLE_NOT, 0));
        // Free-XOR: NOT flips the zero label by the offset, no bytes.
        let mut garbler =
            Garbler::new(GarbleConfig::new(80), &circ, &[], vec![0u8], Block::new(4));
        let chunks = run_all(&mut garbler, &circ);
        assert_eq!(chunks[1].len(), 0);
        assert_eq!(garbler.zero_label(1), garbler.zero_label(0) ^ garbler.delta());

        // Without free-XOR a unary gate costs one row under GRR.
        let mut cfg = GarbleConfig::new(80);
        cfg.free_xor = false;
        let mut garbler = Garbler::new(cfg, &circ, &[], vec![0u8], Block::new(4));
        let chunks = run_all(&mut garbler, &circ);
        assert_eq!(chunks[1].len(), 10);
    }

    #[test]
    fn test_evl_input_sizes_and_keys() {
        let mut circ = Circuit::new(1);
        circ.push(Gate::evl_input(0));
        let keys = [Block::new(0xa), Block::new(0xb)];
        let mut garbler =
            Garbler::new(GarbleConfig::new(80), &circ, &keys, vec![], Block::new(5));
        let chunks = run_all(&mut garbler, &circ);
        assert_eq!(chunks[0].len(), 20);

        // The two ciphertexts decrypt to the two labels of the wire.
        let zero = garbler.zero_label(0);
        let c0 = label::read_label(&chunks[0][..10]);
        let c1 = label::read_label(&chunks[0][10..]);
        assert_eq!(c0 ^ keys[0], zero);
        assert_eq!(c1 ^ keys[1], zero ^ garbler.delta());
    }

    #[test]
    fn test_wire_labels_masked() {
        let circ = and_circuit();
        let mut garbler =
            Garbler::new(GarbleConfig::new(80), &circ, &[], vec![0b01u8], Block::new(6));
        run_all(&mut garbler, &circ);
        let mask = Block::mask_lo(80);
        for wire in 0..circ.wire_count {
            let l = garbler.zero_label(wire);
            assert_eq!(l & mask, l);
        }
    }

    #[test]
    fn test_stream_deterministic() {
        let circ = and_circuit();
        let seed = Block::new(0x5eed);
        let mut a = Garbler::new(GarbleConfig::new(80), &circ, &[], vec![0b11u8], seed);
        let mut b = Garbler::new(GarbleConfig::new(80), &circ, &[], vec![0b11u8], seed);
        assert_eq!(run_all(&mut a, &circ), run_all(&mut b, &circ));

        let row_a = a.bind_gen_input(&[0b11], 0).to_vec();
        let row_b = b.bind_gen_input(&[0b11], 0).to_vec();
        assert_eq!(row_a, row_b);
        assert_eq!(row_a.len(), 20);
    }

    #[test]
    fn test_missing_ot_keys() {
        let mut circ = Circuit::new(1);
        circ.push(Gate::evl_input(0));
        let mut garbler =
            Garbler::new(GarbleConfig::new(80), &circ, &[], vec![], Block::new(7));
        assert!(matches!(
            garbler.next_gate(&circ.gates[0]),
            Err(GeneratorError::MissingOtKeys { wire: 0 })
        ));
    }
}
