//! 派生性能基准测试
//! 使用criterion进行性能测试

use bismuth_hd::{mnemonic_to_seed, DeriveOptions, Deriver};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn bench_seed_derivation(c: &mut Criterion) {
    c.bench_function("mnemonic_to_seed", |b| {
        b.iter(|| mnemonic_to_seed(black_box(MNEMONIC), black_box("TREZOR")).unwrap())
    });
}

fn bench_address_window(c: &mut Criterion) {
    let sequential = Deriver::new(DeriveOptions {
        max_workers: 1,
        ..DeriveOptions::default()
    });
    let parallel = Deriver::new(DeriveOptions {
        parallel_threshold: 1,
        ..DeriveOptions::default()
    });

    let mut group = c.benchmark_group("derive_addresses");
    group.sample_size(20);
    for count in [1u32, 16, 64] {
        group.bench_with_input(BenchmarkId::new("sequential", count), &count, |b, &n| {
            b.iter(|| sequential.derive_addresses(MNEMONIC, "", 0, n).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("parallel", count), &count, |b, &n| {
            b.iter(|| parallel.derive_addresses(MNEMONIC, "", 0, n).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_seed_derivation, bench_address_window);
criterion_main!(benches);
