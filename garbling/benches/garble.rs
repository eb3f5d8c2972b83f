use circuit::{Circuit, Gate, GateKind, TABLE_AND, TABLE_XOR};
use criterion::{criterion_group, criterion_main, Criterion};
use crypto_core::Block;
use garbling::{GarbleConfig, Garbler};
use std::time::Duration;

/// Alternating AND/XOR ladder over two generator inputs.
fn ladder(depth: usize) -> Circuit {
    let mut circ = Circuit::new(2 + depth);
    circ.push(Gate::gen_input(0));
    circ.push(Gate::gen_input(1));
    for i in 0..depth {
        let id = 2 + i;
        let kind = if i + 1 == depth {
            GateKind::EvlOutput
        } else {
            GateKind::Internal
        };
        let table = if i % 2 == 0 { TABLE_AND } else { TABLE_XOR };
        let left = if i == 0 { 0 } else { id - 1 };
        circ.push(Gate::binary(id, kind, table, left, 1));
    }
    circ
}

fn bench_garble_ladder(c: &mut Criterion) {
    c.bench_function("garble 10k-gate ladder", |b| {
        let circ = ladder(10_000);
        let cfg = GarbleConfig::new(80);
        b.iter(|| {
            let mut garbler = Garbler::new(cfg, &circ, &[], vec![0b01u8], Block::new(7));
            let mut emitted = 0usize;
            for gate in circ.gates.iter() {
                emitted += garbler.next_gate(gate).unwrap().len();
            }
            criterion::black_box(emitted)
        });
    });
}

criterion_group! {
    name = garble;
    config = Criterion::default().warm_up_time(Duration::from_millis(100));
    targets = bench_garble_ladder
}
criterion_main!(garble);
