//! # Verification Consensus Benchmarks
//!
//! Signature checking for a full round. Rounds where every verifier agrees
//! collapse into a single aggregate check.

use crate::support::replicators;
use criterion::{BenchmarkId, Criterion};
use sm_01_domain_model::VerificationResult;
use sm_05_verification_consensus::{sign_opinion, VerificationSession};

pub fn bench_round_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("sm-05-verification");
    group.sample_size(20);

    for size in [4u8, 16, 32] {
        let Ok(keys) = replicators(1, size) else { return };
        let provers: Vec<_> = keys.iter().map(|k| k.account.public_key()).collect();
        let bls_keys: Vec<_> = keys.iter().map(|k| k.bls.public_key()).collect();
        let Ok(mut session) = VerificationSession::new([0x0D; 32], [0x7E; 32], provers) else {
            return;
        };

        let results: Vec<_> = (0..u16::from(size))
            .map(|prover| VerificationResult {
                prover,
                result: true,
            })
            .collect();
        for (verifier, key) in keys.iter().enumerate() {
            let _ = session.add_opinion(sign_opinion(&key.bls, verifier as u16, results.clone()));
        }

        group.bench_with_input(BenchmarkId::new("verify_signatures", size), &session, |b, s| {
            b.iter(|| s.verify_signatures(&bls_keys))
        });
    }
    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_round_verification(c);
}
