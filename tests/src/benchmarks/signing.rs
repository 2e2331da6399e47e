//! # Signing Benchmarks
//!
//! Transaction signing and hashing, and cosignature collection for
//! aggregates with many cosigners.

use crate::support::{factory, GENERATION_HASH};
use criterion::{black_box, BatchSize, BenchmarkId, Criterion};
use shared_crypto::Ed25519KeyPair;
use sm_03_transactions::{hash_transaction, DriveClosure, TransactionBody};
use sm_06_aggregate_cosigning::{cosign, AggregateBuilder};

pub fn bench_sign_and_hash(c: &mut Criterion) {
    let Ok(f) = factory() else { return };
    let keypair = Ed25519KeyPair::from_seed([0x01; 32]);
    let tx = f.drive_closure([0x02; 32]);
    let Ok(signed) = f.sign(tx.clone(), &keypair) else { return };

    let mut group = c.benchmark_group("sm-03-signing");
    group.bench_function("sign_drive_closure", |b| {
        b.iter_batched(|| tx.clone(), |tx| f.sign(tx, &keypair), BatchSize::SmallInput)
    });
    group.bench_function("hash_signed", |b| {
        b.iter(|| hash_transaction(black_box(&signed.transaction), &GENERATION_HASH))
    });
    group.finish();
}

pub fn bench_cosign_collection(c: &mut Criterion) {
    let Ok(f) = factory() else { return };
    let initiator = Ed25519KeyPair::from_seed([0x01; 32]);
    let mut group = c.benchmark_group("sm-06-cosigning");

    for cosigners in [2u8, 8, 32] {
        let keys: Vec<_> = (0..cosigners)
            .map(|i| Ed25519KeyPair::from_seed([i + 2; 32]))
            .collect();
        let inner = keys.iter().map(|k| {
            f.embedded(
                k.public_key(),
                TransactionBody::DriveClosure(DriveClosure { drive_key: [0x03; 32] }),
            )
        });
        let Ok(pending) = AggregateBuilder::complete().add_all(inner).sign(&f, &initiator) else {
            continue;
        };
        let cosignatures: Vec<_> = keys.iter().map(|k| cosign(k, pending.hash())).collect();

        group.bench_with_input(
            BenchmarkId::new("attach_and_finalize", cosignatures.len()),
            &cosignatures,
            |b, cosignatures| {
                b.iter_batched(
                    || pending.clone(),
                    |mut pending| {
                        let _ = pending.attach_all(cosignatures.iter().copied());
                        pending.finalize()
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_sign_and_hash(c);
    bench_cosign_collection(c);
}
