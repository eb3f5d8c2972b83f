use criterion::{criterion_group, criterion_main, Criterion};
use crypto_core::{kdf128, kdf256, Block};
use std::time::Duration;

fn bench_kdf128(c: &mut Criterion) {
    c.bench_function("kdf128", |b| {
        let tweak = rand::random::<Block>();
        let key = rand::random::<Block>();
        b.iter(|| {
            let z = kdf128(tweak, key);
            criterion::black_box(z)
        });
    });
}

fn bench_kdf256(c: &mut Criterion) {
    c.bench_function("kdf256", |b| {
        let tweak = rand::random::<Block>();
        let keys = [rand::random::<Block>(), rand::random::<Block>()];
        b.iter(|| {
            let z = kdf256(tweak, keys);
            criterion::black_box(z)
        });
    });
}

criterion_group! {
    name = kdf;
    config = Criterion::default().warm_up_time(Duration::from_millis(100));
    targets = bench_kdf128, bench_kdf256
}
criterion_main!(kdf);
