//! Evaluator-side streaming engine.
//!
//! The mirror image of the generator: each [`Evaluator::next_gate`] call
//! consumes exactly the bytes the generator emitted for that gate and
//! stores the wire's active label. The consumed bytes are folded into the
//! running hash in the same order the generator folded them, so the two
//! digests agree exactly when the streams do.

use circuit::{Circuit, Gate, GateKind, TABLE_IDENT, TABLE_NOT, TABLE_XOR};
use crypto_core::{
    utils::{bit_at, set_bit},
    Block,
};

use crate::{
    config::GarbleConfig, decommit::Decommit, errors::EvaluatorError, hash::RunningHash, label,
};

fn take<'b>(
    bytes: &'b [u8],
    cursor: &mut usize,
    n: usize,
    gate: usize,
) -> Result<&'b [u8], EvaluatorError> {
    let end = *cursor + n;
    if end > bytes.len() {
        return Err(EvaluatorError::BufferUnderrun {
            gate,
            need: end,
            have: bytes.len(),
        });
    }
    let out = &bytes[*cursor..end];
    *cursor = end;
    Ok(out)
}

pub struct Evaluator<'a> {
    cfg: GarbleConfig,
    clear_mask: Block,
    /// Active label per wire id.
    wires: Vec<Block>,
    /// The OT key this party chose, one per evaluator-input wire.
    ot_keys: &'a [Block],
    /// The generator's input XOR its mask, bit per generator-input wire.
    masked_gen_inp: Vec<u8>,
    /// This party's own input bits.
    evl_inp: Vec<u8>,
    /// k-bit commitment kept per generator-input wire.
    commit: Vec<Vec<u8>>,
    /// Decommitments delivered out of band, one per generator-input wire.
    decom: Vec<Decommit>,
    evl_out: Vec<u8>,
    gen_out: Vec<u8>,
    /// One bit per binding row.
    binding_hash: Vec<u8>,
    hash: RunningHash,
    gate_ix: u64,
    gen_inp_ix: usize,
    evl_inp_ix: usize,
    gen_out_ix: usize,
    evl_out_ix: usize,
}

impl<'a> Evaluator<'a> {
    /// Set up one circuit instance. `ot_keys[i]` is the key obtained for
    /// evaluator-input wire `i`; `masked_gen_inp` and `evl_inp` are
    /// LSB-first bit strings.
    pub fn new(
        cfg: GarbleConfig,
        circ: &Circuit,
        ot_keys: &'a [Block],
        masked_gen_inp: Vec<u8>,
        evl_inp: Vec<u8>,
    ) -> Self {
        assert!(
            masked_gen_inp.len() * 8 >= circ.gen_inp_cnt,
            "masked generator input shorter than the generator input"
        );
        assert!(
            evl_inp.len() * 8 >= circ.evl_inp_cnt,
            "evaluator input shorter than the circuit input"
        );

        Self {
            cfg,
            clear_mask: cfg.clear_mask(),
            wires: vec![Block::ZERO; circ.wire_count],
            ot_keys,
            masked_gen_inp,
            evl_inp,
            commit: vec![Vec::new(); circ.gen_inp_cnt],
            decom: vec![Decommit::default(); circ.gen_inp_cnt],
            evl_out: vec![0u8; (circ.evl_out_cnt + 7) / 8],
            gen_out: vec![0u8; (circ.gen_out_cnt + 7) / 8],
            binding_hash: vec![0u8; cfg.key_bytes()],
            hash: RunningHash::new(cfg.chunked_hash),
            gate_ix: 0,
            gen_inp_ix: 0,
            evl_inp_ix: 0,
            gen_out_ix: 0,
            evl_out_ix: 0,
        }
    }

    /// Install the decommitment for generator-input wire `ix` before its
    /// gate is consumed.
    pub fn provide_gen_inp_decom(&mut self, ix: usize, decom: Decommit) {
        self.decom[ix] = decom;
    }

    /// Consume one gate's bytes, store the wire's active label and fold
    /// the bytes into the running hash.
    pub fn next_gate(&mut self, gate: &Gate, bytes: &[u8]) -> Result<(), EvaluatorError> {
        let mut cursor = 0usize;

        let active = match gate.kind {
            GateKind::GenInput => self.eval_gen_input(bytes, &mut cursor, gate.id)?,
            GateKind::EvlInput => self.eval_evl_input(bytes, &mut cursor, gate.id)?,
            _ => {
                let active = match gate.arity() {
                    2 => self.eval_binary(gate, bytes, &mut cursor)?,
                    1 => self.eval_unary(gate, bytes, &mut cursor)?,
                    arity => {
                        return Err(EvaluatorError::InvalidArity {
                            gate: gate.id,
                            arity,
                        })
                    }
                };
                match gate.kind {
                    GateKind::EvlOutput => {
                        let tag = take(bytes, &mut cursor, 1, gate.id)?[0];
                        let bit = active.lsb() ^ (tag & 1 == 1);
                        set_bit(&mut self.evl_out, self.evl_out_ix, bit);
                        self.evl_out_ix += 1;
                    }
                    GateKind::GenOutput => {
                        let tag = take(bytes, &mut cursor, 1, gate.id)?[0];
                        let bit = active.lsb() ^ (tag & 1 == 1);
                        set_bit(&mut self.gen_out, self.gen_out_ix, bit);
                        self.gen_out_ix += 1;
                    }
                    _ => {}
                }
                active
            }
        };

        self.wires[gate.id] = active;
        self.hash.update(bytes);
        self.gate_ix += 1;
        Ok(())
    }

    fn eval_gen_input(
        &mut self,
        bytes: &[u8],
        cursor: &mut usize,
        gate_id: usize,
    ) -> Result<Block, EvaluatorError> {
        let kbytes = self.cfg.key_bytes();
        let m = bit_at(&self.masked_gen_inp, self.gen_inp_ix) as usize;

        let coms = [
            take(bytes, cursor, kbytes, gate_id)?,
            take(bytes, cursor, kbytes, gate_id)?,
        ];
        self.commit[self.gen_inp_ix] = coms[m].to_vec();

        let decom = &self.decom[self.gen_inp_ix];
        if decom.is_empty() {
            return Err(EvaluatorError::MissingDecommitment(self.gen_inp_ix));
        }
        let active = decom.label(kbytes);

        self.gen_inp_ix += 1;
        Ok(active)
    }

    fn eval_evl_input(
        &mut self,
        bytes: &[u8],
        cursor: &mut usize,
        gate_id: usize,
    ) -> Result<Block, EvaluatorError> {
        let kbytes = self.cfg.key_bytes();
        let b = bit_at(&self.evl_inp, self.evl_inp_ix) as usize;

        let cts = [
            take(bytes, cursor, kbytes, gate_id)?,
            take(bytes, cursor, kbytes, gate_id)?,
        ];
        let key = self
            .ot_keys
            .get(self.evl_inp_ix)
            .ok_or(EvaluatorError::MissingOtKey {
                wire: self.evl_inp_ix,
            })?;

        let active = (*key & self.clear_mask) ^ label::read_label(cts[b]);
        self.evl_inp_ix += 1;
        Ok(active)
    }

    fn eval_binary(
        &mut self,
        gate: &Gate,
        bytes: &[u8],
        cursor: &mut usize,
    ) -> Result<Block, EvaluatorError> {
        let a = self.wires[gate.inputs[0]];
        let b = self.wires[gate.inputs[1]];

        if self.cfg.free_xor && gate.table == TABLE_XOR {
            return Ok(a ^ b);
        }

        let kbytes = self.cfg.key_bytes();
        let tweak = label::gate_tweak(self.gate_ix);
        let cipher = label::prf2(tweak, [a, b], self.clear_mask);
        let garbled_ix = ((b.lsb() as usize) << 1) | a.lsb() as usize;

        let active = if self.cfg.grr {
            let rows = take(bytes, cursor, 3 * kbytes, gate.id)?;
            if garbled_ix == 0 {
                cipher
            } else {
                let row = &rows[(garbled_ix - 1) * kbytes..garbled_ix * kbytes];
                cipher ^ label::read_label(row)
            }
        } else {
            let rows = take(bytes, cursor, 4 * kbytes, gate.id)?;
            let row = &rows[garbled_ix * kbytes..(garbled_ix + 1) * kbytes];
            cipher ^ label::read_label(row)
        };
        Ok(active)
    }

    fn eval_unary(
        &mut self,
        gate: &Gate,
        bytes: &[u8],
        cursor: &mut usize,
    ) -> Result<Block, EvaluatorError> {
        let a = self.wires[gate.inputs[0]];

        // Free gates pass the label straight through; the generator has
        // already folded any inversion into the wire's zero label.
        if self.cfg.free_xor && matches!(gate.table, TABLE_IDENT | TABLE_NOT) {
            return Ok(a);
        }

        let kbytes = self.cfg.key_bytes();
        let tweak = label::gate_tweak(self.gate_ix);
        let cipher = label::prf1(tweak, a, self.clear_mask);
        let perm = a.lsb() as usize;

        let active = if self.cfg.grr {
            let rows = take(bytes, cursor, kbytes, gate.id)?;
            if perm == 0 {
                cipher
            } else {
                cipher ^ label::read_label(rows)
            }
        } else {
            let rows = take(bytes, cursor, 2 * kbytes, gate.id)?;
            let row = &rows[perm * kbytes..(perm + 1) * kbytes];
            cipher ^ label::read_label(row)
        };
        Ok(active)
    }

    /// Consume one generator-input binding row and record its bit.
    /// Binding rows are not part of the hashed circuit stream.
    pub fn bind_gen_input(
        &mut self,
        row: &[u8],
        row_ix: u64,
        bytes: &[u8],
    ) -> Result<(), EvaluatorError> {
        let kbytes = self.cfg.key_bytes();

        let mut out = Decommit::zeroed(2 * kbytes);
        for j in 0..self.decom.len() {
            if bit_at(row, j) {
                if self.decom[j].is_empty() {
                    return Err(EvaluatorError::MissingDecommitment(j));
                }
                out.xor_assign(&self.decom[j]);
            }
        }

        if bytes.len() < 2 * kbytes {
            return Err(EvaluatorError::RowUnderrun {
                row: row_ix as usize,
                need: 2 * kbytes,
                have: bytes.len(),
            });
        }

        let sel = out.lsb() as usize;
        let ct = &bytes[sel * kbytes..(sel + 1) * kbytes];
        let cipher = label::prf1(label::gate_tweak(row_ix), out.label(kbytes), self.clear_mask);
        let out_key = label::read_label(ct) ^ cipher;

        set_bit(&mut self.binding_hash, row_ix as usize, out_key.lsb());
        Ok(())
    }

    /// True iff every provided decommitment hashes to the commitment
    /// taken from the stream.
    pub fn check_commitments(&self) -> bool {
        self.decom
            .iter()
            .zip(self.commit.iter())
            .all(|(d, c)| !d.is_empty() && !c.is_empty() && d.commit(self.cfg.k) == *c)
    }

    /// This party's output bits, LSB-first packed.
    pub fn evl_out(&self) -> &[u8] {
        &self.evl_out
    }

    /// The generator's output bits, decoded here and shipped back.
    pub fn gen_out(&self) -> &[u8] {
        &self.gen_out
    }

    /// The generator-input binding bits, one per row.
    pub fn gen_input_hash(&self) -> &[u8] {
        &self.binding_hash
    }

    /// Active label currently stored for `wire`.
    pub fn active_label(&self, wire: usize) -> Block {
        self.wires[wire]
    }

    pub fn config(&self) -> GarbleConfig {
        self.cfg
    }

    /// Digest of every gate's bytes consumed so far.
    pub fn digest(&mut self) -> [u8; 32] {
        self.hash.digest()
    }
}
