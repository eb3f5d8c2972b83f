//! The tagged gate and circuit model consumed by the garbling engines.
//!
//! Every wire is produced by exactly one gate, and gates are listed in
//! topological order. Input wires are produced by explicit input gates
//! with no fan-in; a gate whose output leaves the circuit is tagged with
//! the party the output belongs to.

use crate::errors::CircuitEvalError;
use crypto_core::utils::{bit_at, set_bit};

/// Who a gate's value belongs to, or `Internal` for plain fan-out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateKind {
    /// Generator-input wire; the gate stream carries its commitments.
    GenInput,
    /// Evaluator-input wire; the gate stream carries OT-key ciphertexts.
    EvlInput,
    /// Gate whose plaintext bit is revealed to the generator.
    GenOutput,
    /// Gate whose plaintext bit is revealed to the evaluator.
    EvlOutput,
    Internal,
}

/// 2-arity truth tables, indexed by `(y << 1) | x`.
pub const TABLE_XOR: u8 = 0b0110;
pub const TABLE_AND: u8 = 0b1000;
pub const TABLE_OR: u8 = 0b1110;

/// 1-arity truth tables, indexed by `x`.
pub const TABLE_NOT: u8 = 0b01;
pub const TABLE_IDENT: u8 = 0b10;

#[derive(Clone, Debug, PartialEq)]
pub struct Gate {
    /// Output wire id; doubles as the gate's slot in the wire table.
    pub id: usize,
    pub kind: GateKind,
    /// Truth table, 4 bits for 2-arity and 2 bits for 1-arity gates.
    /// Unused for input gates.
    pub table: u8,
    /// Input wire ids; empty for input gates.
    pub inputs: Vec<usize>,
}

impl Gate {
    pub fn gen_input(id: usize) -> Self {
        Self {
            id,
            kind: GateKind::GenInput,
            table: 0,
            inputs: Vec::new(),
        }
    }

    pub fn evl_input(id: usize) -> Self {
        Self {
            id,
            kind: GateKind::EvlInput,
            table: 0,
            inputs: Vec::new(),
        }
    }

    pub fn unary(id: usize, kind: GateKind, table: u8, input: usize) -> Self {
        Self {
            id,
            kind,
            table,
            inputs: vec![input],
        }
    }

    pub fn binary(id: usize, kind: GateKind, table: u8, left: usize, right: usize) -> Self {
        Self {
            id,
            kind,
            table,
            inputs: vec![left, right],
        }
    }

    pub fn arity(&self) -> usize {
        self.inputs.len()
    }

    #[inline]
    pub fn table_bit(&self, ix: u8) -> u8 {
        (self.table >> ix) & 1
    }

    pub fn is_input(&self) -> bool {
        matches!(self.kind, GateKind::GenInput | GateKind::EvlInput)
    }
}

/// A circuit: gates in topological order plus the per-party wire counts.
#[derive(Clone, Debug, Default)]
pub struct Circuit {
    pub gates: Vec<Gate>,
    /// Total number of wires; the wire table is sized by this.
    pub wire_count: usize,
    pub gen_inp_cnt: usize,
    pub evl_inp_cnt: usize,
    pub gen_out_cnt: usize,
    pub evl_out_cnt: usize,
}

impl Circuit {
    pub fn new(wire_count: usize) -> Self {
        Self {
            wire_count,
            ..Default::default()
        }
    }

    /// Append a gate, keeping the per-party counts current.
    pub fn push(&mut self, gate: Gate) {
        match gate.kind {
            GateKind::GenInput => self.gen_inp_cnt += 1,
            GateKind::EvlInput => self.evl_inp_cnt += 1,
            GateKind::GenOutput => self.gen_out_cnt += 1,
            GateKind::EvlOutput => self.evl_out_cnt += 1,
            GateKind::Internal => {}
        }
        self.gates.push(gate);
    }

    /// Evaluate in plaintext. Inputs and outputs are LSB-first packed bit
    /// strings; output bits appear in the order their gates do.
    pub fn eval(
        &self,
        gen_inp: &[u8],
        evl_inp: &[u8],
    ) -> Result<(Vec<u8>, Vec<u8>), CircuitEvalError> {
        if gen_inp.len() * 8 < self.gen_inp_cnt {
            return Err(CircuitEvalError::InputTooShort {
                need: self.gen_inp_cnt,
                have: gen_inp.len() * 8,
            });
        }
        if evl_inp.len() * 8 < self.evl_inp_cnt {
            return Err(CircuitEvalError::InputTooShort {
                need: self.evl_inp_cnt,
                have: evl_inp.len() * 8,
            });
        }

        let mut wires: Vec<Option<bool>> = vec![None; self.wire_count];
        let mut gen_out = vec![0u8; (self.gen_out_cnt + 7) / 8];
        let mut evl_out = vec![0u8; (self.evl_out_cnt + 7) / 8];
        let (mut gi, mut ei, mut go, mut eo) = (0, 0, 0, 0);

        for gate in self.gates.iter() {
            let value = match gate.kind {
                GateKind::GenInput => {
                    let v = bit_at(gen_inp, gi);
                    gi += 1;
                    v
                }
                GateKind::EvlInput => {
                    let v = bit_at(evl_inp, ei);
                    ei += 1;
                    v
                }
                _ => {
                    let mut ix = 0u8;
                    for (pos, wire) in gate.inputs.iter().enumerate() {
                        let v = wires[*wire]
                            .ok_or(CircuitEvalError::UninitializedValue(*wire))?;
                        ix |= (v as u8) << pos;
                    }
                    gate.table_bit(ix) == 1
                }
            };

            match gate.kind {
                GateKind::GenOutput => {
                    set_bit(&mut gen_out, go, value);
                    go += 1;
                }
                GateKind::EvlOutput => {
                    set_bit(&mut evl_out, eo, value);
                    eo += 1;
                }
                _ => {}
            }
            wires[gate.id] = Some(value);
        }

        Ok((gen_out, evl_out))
    }
}
