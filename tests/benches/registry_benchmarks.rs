//! # Shard Registry Benchmarks
//!
//! | Operation | Work |
//! |-----------|------|
//! | derive | two Keccak-256 hashes |
//! | create_shard | derive + factory insert + two appends |
//! | classify | length match + field copies |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shard_registry::{
    AddressDeriver, Create2Deriver, InMemoryInputBox, InMemoryUnitFactory, MainNotice, Notice,
    ShardId, ShardRegistryApi, ShardRegistryService, TemplateHash, UnitAddress,
};

const FACTORY: UnitAddress = UnitAddress::new([0xFA; 20]);
const MAIN: UnitAddress = UnitAddress::new([0x11; 20]);
const OWNER: UnitAddress = UnitAddress::new([0x22; 20]);
const TEMPLATE: TemplateHash = TemplateHash::new([0x2E; 32]);

fn bench_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivation");

    for code_len in [32usize, 1024, 16 * 1024] {
        let deriver = Create2Deriver::new(FACTORY, vec![0x60; code_len]);
        group.throughput(Throughput::Bytes(code_len as u64));
        group.bench_with_input(BenchmarkId::new("derive", code_len), &deriver, |b, d| {
            b.iter(|| d.derive(black_box(&MAIN), black_box(&TEMPLATE), &ShardId::from_u64(1)))
        });
    }

    group.finish();
}

fn bench_create_shard(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_shard");

    for batch in [10u64, 100, 1000] {
        group.throughput(Throughput::Elements(batch));
        group.bench_with_input(BenchmarkId::new("sequential", batch), &batch, |b, &n| {
            b.iter(|| {
                let service = ShardRegistryService::new(
                    Create2Deriver::new(FACTORY, vec![0x60; 64]),
                    InMemoryUnitFactory::new(FACTORY, vec![0x60; 64]),
                    InMemoryInputBox::new(UnitAddress::ZERO),
                    64,
                );
                for id in 0..n {
                    black_box(
                        service
                            .create_shard(&MAIN, &OWNER, &TEMPLATE, &ShardId::from_u64(id))
                            .ok(),
                    );
                }
            })
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let payload = MainNotice {
        shard: UnitAddress::new([0x33; 20]),
        owner: OWNER,
        verifier_template_hash: TEMPLATE,
        shard_id: ShardId::from_u64(1),
    }
    .encode();

    c.bench_function("classify_main_notice", |b| {
        b.iter(|| Notice::classify(black_box(&payload)).ok())
    });
}

criterion_group!(benches, bench_derivation, bench_create_shard, bench_classify);
criterion_main!(benches);
