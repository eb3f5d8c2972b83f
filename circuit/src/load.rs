//! Load Bristol-fashion circuit files into the tagged gate model.
//!
//! The format (`https://homes.esat.kuleuven.be/~nsmart/MPC/`) has no
//! notion of input or output ownership, so the caller says how many of
//! the leading input wires belong to the generator and how many of the
//! trailing output wires it learns. Output bits are ordered by gate
//! appearance, which is also the order the engines emit them in.

use crate::errors::CircuitLoadError;
use crate::gate::{Circuit, Gate, GateKind, TABLE_AND, TABLE_NOT, TABLE_XOR};
use anyhow::{anyhow, Context};
use regex::Regex;
use std::{
    fs::File,
    io::{BufRead, BufReader},
};

/// Parse captures into a Vec.
fn parse_to_vec<'a>(re: &Regex, line: &'a str) -> Vec<&'a str> {
    re.captures_iter(line)
        .map(|cap| cap.get(1).unwrap().as_str())
        .collect()
}

fn parse_counts(re: &Regex, line: &str, what: &str) -> Result<Vec<usize>, CircuitLoadError> {
    parse_to_vec(re, line)
        .iter()
        .map(|s| {
            s.parse::<usize>()
                .with_context(|| format!("Failed to parse {}: {}", what, s))
                .map_err(CircuitLoadError::from)
        })
        .collect()
}

impl Circuit {
    /// Load a Bristol-fashion circuit file from `filename`.
    pub fn load(
        filename: &str,
        gen_inp_wires: usize,
        gen_out_wires: usize,
    ) -> Result<Self, CircuitLoadError> {
        let f = File::open(filename)
            .with_context(|| format!("Failed to read circuit from {}", filename))?;
        Self::parse(BufReader::new(f), gen_inp_wires, gen_out_wires)
    }

    /// Parse Bristol-fashion circuit text from any buffered reader.
    pub fn parse<R: BufRead>(
        mut reader: R,
        gen_inp_wires: usize,
        gen_out_wires: usize,
    ) -> Result<Self, CircuitLoadError> {
        let re = Regex::new(r"(\d+)\s*").context("Failed to compile regex")?;

        // First line: ngates nwires
        let mut line = String::new();
        reader.read_line(&mut line).context("Failed to read line")?;
        let line_1 = parse_counts(&re, &line, "ngates/nwires")?;
        if line_1.len() != 2 {
            return Err(CircuitLoadError::ParsingError(anyhow!(
                "Expecting line to be ngates, nwires: {}",
                line
            )));
        }
        let (ngates, nwires) = (line_1[0], line_1[1]);

        // Second line: ninputs input_0_nwires input_1_nwires...
        let mut line = String::new();
        reader.read_line(&mut line).context("Failed to read line")?;
        let line_2 = parse_counts(&re, &line, "input counts")?;
        if line_2.is_empty() || line_2.len() != line_2[0] + 1 {
            return Err(CircuitLoadError::ParsingError(anyhow!(
                "Expecting wire count to be specified for every input: {}",
                line
            )));
        }
        let ninput_wires: usize = line_2[1..].iter().sum();

        // Third line: noutputs output_0_nwires output_1_nwires...
        let mut line = String::new();
        reader.read_line(&mut line).context("Failed to read line")?;
        let line_3 = parse_counts(&re, &line, "output counts")?;
        if line_3.is_empty() || line_3.len() != line_3[0] + 1 {
            return Err(CircuitLoadError::ParsingError(anyhow!(
                "Expecting wire count to be specified for every output: {}",
                line
            )));
        }
        let noutput_wires: usize = line_3[1..].iter().sum();

        if gen_inp_wires > ninput_wires {
            return Err(CircuitLoadError::ParsingError(anyhow!(
                "Generator input wires ({gen_inp_wires}) exceed circuit inputs ({ninput_wires})"
            )));
        }
        if gen_out_wires > noutput_wires {
            return Err(CircuitLoadError::ParsingError(anyhow!(
                "Generator output wires ({gen_out_wires}) exceed circuit outputs ({noutput_wires})"
            )));
        }

        let mut circ = Circuit::new(nwires);
        for wire in 0..ninput_wires {
            if wire < gen_inp_wires {
                circ.push(Gate::gen_input(wire));
            } else {
                circ.push(Gate::evl_input(wire));
            }
        }

        let out_start = nwires - noutput_wires;
        let kind_for = |out_id: usize| {
            if out_id < out_start {
                GateKind::Internal
            } else if out_id - out_start >= noutput_wires - gen_out_wires {
                GateKind::GenOutput
            } else {
                GateKind::EvlOutput
            }
        };

        let re_gate = Regex::new(r"(\d+|\S+)\s*").context("Failed to compile regex")?;
        let mut parsed = 0;

        for line in reader.lines() {
            let line = line.context("Failed to read line")?;
            if line.is_empty() {
                continue;
            }
            let gate_info = parse_to_vec(&re_gate, &line);
            let gate_type = *gate_info.last().ok_or_else(|| anyhow!("Empty gate line"))?;
            let gate = match gate_type {
                "INV" => {
                    let lin_id: usize = gate_info[2].parse().context("Failed to parse gate")?;
                    let out_id: usize = gate_info[3].parse().context("Failed to parse gate")?;
                    Gate::unary(out_id, kind_for(out_id), TABLE_NOT, lin_id)
                }
                "AND" | "XOR" => {
                    let lin_id: usize = gate_info[2].parse().context("Failed to parse gate")?;
                    let rin_id: usize = gate_info[3].parse().context("Failed to parse gate")?;
                    let out_id: usize = gate_info[4].parse().context("Failed to parse gate")?;
                    let table = if gate_type == "AND" { TABLE_AND } else { TABLE_XOR };
                    Gate::binary(out_id, kind_for(out_id), table, lin_id, rin_id)
                }
                _ => {
                    return Err(CircuitLoadError::ParsingError(anyhow!(
                        "Encountered unsupported gate type: {}",
                        gate_type
                    )));
                }
            };
            circ.push(gate);
            parsed += 1;
        }

        if parsed != ngates {
            return Err(CircuitLoadError::ParsingError(anyhow!(
                "Expecting {ngates} gates, parsed {parsed}"
            )));
        }
        Ok(circ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SMALL: &str = "2 6\n2 2 2\n1 2\n\n2 1 0 2 4 XOR\n2 1 1 3 5 AND\n";

    #[test]
    fn test_parse_small() {
        let circ = Circuit::parse(Cursor::new(SMALL), 2, 0).unwrap();
        assert_eq!(circ.wire_count, 6);
        assert_eq!(circ.gen_inp_cnt, 2);
        assert_eq!(circ.evl_inp_cnt, 2);
        assert_eq!(circ.evl_out_cnt, 2);
        assert_eq!(circ.gen_out_cnt, 0);
        assert_eq!(circ.gates.len(), 6);

        // a = 01, b = 10: outputs are (a0 ^ b0, a1 & b1) = (1, 0).
        let (_, evl_out) = circ.eval(&[0b01], &[0b10]).unwrap();
        assert_eq!(evl_out, vec![0b01]);
        // a = 10, b = 11: (0 ^ 1, 1 & 1) = (1, 1).
        let (_, evl_out) = circ.eval(&[0b10], &[0b11]).unwrap();
        assert_eq!(evl_out, vec![0b11]);
    }

    #[test]
    fn test_parse_generator_outputs() {
        let circ = Circuit::parse(Cursor::new(SMALL), 2, 1).unwrap();
        assert_eq!(circ.evl_out_cnt, 1);
        assert_eq!(circ.gen_out_cnt, 1);

        let (gen_out, evl_out) = circ.eval(&[0b11], &[0b11]).unwrap();
        assert_eq!(evl_out, vec![0b0]);
        assert_eq!(gen_out, vec![0b1]);
    }

    #[test]
    fn test_parse_inv() {
        let text = "1 2\n1 1\n1 1\n\n1 1 0 1 INV\n";
        let circ = Circuit::parse(Cursor::new(text), 1, 0).unwrap();
        assert_eq!(circ.gates.len(), 2);
        let (_, out) = circ.eval(&[0], &[]).unwrap();
        assert_eq!(out, vec![1]);
    }

    #[test]
    fn test_parse_bad_header() {
        let err = Circuit::parse(Cursor::new("2\n"), 0, 0);
        assert!(err.is_err());
    }

    #[test]
    fn test_parse_gate_count_mismatch() {
        let text = "3 6\n2 2 2\n1 2\n\n2 1 0 2 4 XOR\n2 1 1 3 5 AND\n";
        assert!(Circuit::parse(Cursor::new(text), 2, 0).is_err());
    }
}
