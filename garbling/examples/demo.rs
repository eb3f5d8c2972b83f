//! One protocol instance between two threads: a 2-bit adder where the
//! generator holds `a`, the evaluator holds `b`, and the evaluator
//! learns the 3-bit sum.

use circuit::{Circuit, Gate, GateKind, TABLE_AND, TABLE_XOR};
use crypto_core::{local_channel_pair, utils::unpack_bits, AesRng};
use garbling::{GarbleConfig, TwoPartyGarbling};
use std::thread;

/// Ripple-carry adder for two 2-bit numbers.
fn adder2() -> Circuit {
    let mut circ = Circuit::new(11);
    circ.push(Gate::gen_input(0)); // a0
    circ.push(Gate::gen_input(1)); // a1
    circ.push(Gate::evl_input(2)); // b0
    circ.push(Gate::evl_input(3)); // b1
    circ.push(Gate::binary(4, GateKind::EvlOutput, TABLE_XOR, 0, 2)); // s0
    circ.push(Gate::binary(5, GateKind::Internal, TABLE_AND, 0, 2)); // c1
    circ.push(Gate::binary(6, GateKind::Internal, TABLE_XOR, 1, 3));
    circ.push(Gate::binary(7, GateKind::EvlOutput, TABLE_XOR, 6, 5)); // s1
    circ.push(Gate::binary(8, GateKind::Internal, TABLE_AND, 1, 3));
    circ.push(Gate::binary(9, GateKind::Internal, TABLE_AND, 6, 5));
    circ.push(Gate::binary(10, GateKind::EvlOutput, TABLE_XOR, 8, 9)); // s2
    circ
}

fn main() {
    tracing_subscriber::fmt::init();

    let a = 0b10u8; // generator's 2
    let b = 0b11u8; // evaluator's 3
    let circ = adder2();
    let cfg = GarbleConfig::new(80);

    let (gen_channel, evl_channel) = local_channel_pair();
    let circ_gen = circ.clone();
    let generator = thread::spawn(move || {
        let mut rng = AesRng::new();
        let mut prot = TwoPartyGarbling::new(gen_channel, cfg);
        prot.run_generator(&circ_gen, &[a], 8, &mut rng).unwrap()
    });

    let mut prot = TwoPartyGarbling::new(evl_channel, cfg);
    let outcome = prot.run_evaluator(&circ, &[b], 8).unwrap();
    generator.join().unwrap();

    let sum: u8 = unpack_bits(&outcome.evl_out, 3)
        .iter()
        .enumerate()
        .map(|(i, bit)| (*bit as u8) << i)
        .sum();
    println!("{a:02b} + {b:02b} = {sum:03b}");
    assert_eq!(sum, a + b);
}
