use circuit::{Circuit, Gate, GateKind, TABLE_AND, TABLE_XOR};
use criterion::{criterion_group, criterion_main, Criterion};
use std::time::Duration;

/// A ladder of alternating XOR/AND gates over two generator inputs and
/// two evaluator inputs.
fn ladder(depth: usize) -> Circuit {
    let mut circ = Circuit::new(4 + depth);
    circ.push(Gate::gen_input(0));
    circ.push(Gate::gen_input(1));
    circ.push(Gate::evl_input(2));
    circ.push(Gate::evl_input(3));

    for i in 0..depth {
        let id = 4 + i;
        let kind = if i + 1 == depth {
            GateKind::EvlOutput
        } else {
            GateKind::Internal
        };
        let table = if i % 2 == 0 { TABLE_XOR } else { TABLE_AND };
        let left = if i == 0 { 0 } else { id - 1 };
        circ.push(Gate::binary(id, kind, table, left, i % 4));
    }
    circ
}

fn bench_eval(c: &mut Criterion) {
    c.bench_function("circuit eval 10k gates", |b| {
        let circ = ladder(10_000);
        b.iter(|| {
            let out = circ.eval(&[0b11], &[0b01]).unwrap();
            criterion::black_box(out)
        });
    });
}

criterion_group! {
    name = circuit_eval;
    config = Criterion::default().warm_up_time(Duration::from_millis(100));
    targets = bench_eval
}
criterion_main!(circuit_eval);
