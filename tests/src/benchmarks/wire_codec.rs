//! # Wire Codec Benchmarks
//!
//! Encode and decode cost by transaction shape:
//! - Fixed-size body (drive closure)
//! - Variable payload (start execute, growing call data)
//! - Aggregate with a growing number of inner transactions

use crate::support::factory;
use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use shared_types::{Amount, BlsPublicKey};
use sm_03_transactions::{decode, encode, Mosaic, Transaction, TransactionFactory};

fn start_execute(f: &TransactionFactory, data_len: usize) -> Transaction {
    let mut rng = rand::thread_rng();
    let data: Vec<u8> = (0..data_len).map(|_| rng.gen()).collect();
    f.start_execute(
        [0x5C; 32],
        "run",
        vec![Mosaic {
            id: 0x6C1B_9239_1CCB_41C9,
            amount: Amount(1_000),
        }],
        data,
    )
}

fn aggregate(f: &TransactionFactory, inner: usize) -> Transaction {
    let txs = (0..inner)
        .map(|i| {
            f.embedded(
                [i as u8; 32],
                f.replicator_onboarding(Amount(1 << 32), BlsPublicKey::new([i as u8; 48]))
                    .body,
            )
        })
        .collect();
    f.aggregate_complete(txs)
}

pub fn bench_fixed_body(c: &mut Criterion) {
    let Ok(f) = factory() else { return };
    let tx = f.drive_closure([0x01; 32]);
    let Ok(bytes) = encode(&tx) else { return };

    let mut group = c.benchmark_group("sm-03-wire-codec/fixed");
    group.bench_function("encode_drive_closure", |b| b.iter(|| encode(black_box(&tx))));
    group.bench_function("decode_drive_closure", |b| b.iter(|| decode(black_box(&bytes))));
    group.finish();
}

pub fn bench_variable_payload(c: &mut Criterion) {
    let Ok(f) = factory() else { return };
    let mut group = c.benchmark_group("sm-03-wire-codec/payload");

    for size in [64usize, 1024, 16 * 1024] {
        let tx = start_execute(&f, size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("encode_start_execute", size), &tx, |b, tx| {
            b.iter(|| encode(black_box(tx)))
        });
    }
    group.finish();
}

pub fn bench_aggregate(c: &mut Criterion) {
    let Ok(f) = factory() else { return };
    let mut group = c.benchmark_group("sm-03-wire-codec/aggregate");

    for inner in [1usize, 10, 100] {
        let tx = aggregate(&f, inner);
        let Ok(bytes) = encode(&tx) else { continue };
        group.throughput(Throughput::Elements(inner as u64));
        group.bench_with_input(BenchmarkId::new("encode", inner), &tx, |b, tx| {
            b.iter(|| encode(black_box(tx)))
        });
        group.bench_with_input(BenchmarkId::new("decode", inner), &bytes, |b, bytes| {
            b.iter(|| decode(black_box(bytes)))
        });
    }
    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_fixed_body(c);
    bench_variable_payload(c);
    bench_aggregate(c);
}
