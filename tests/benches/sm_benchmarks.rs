//! # Storage Market Benchmarks
//!
//! | Subsystem | Measured |
//! |-----------|----------|
//! | sm-03 Transactions | encode/decode by shape, sign, hash |
//! | sm-05 Verification Consensus | round signature checks |
//! | sm-06 Aggregate Cosigning | attach and finalize |

use criterion::{criterion_group, criterion_main, Criterion};
use sm_tests::benchmarks::{consensus, signing, wire_codec};

fn wire_codec_benches(c: &mut Criterion) {
    wire_codec::register_benchmarks(c);
}

fn signing_benches(c: &mut Criterion) {
    signing::register_benchmarks(c);
}

fn consensus_benches(c: &mut Criterion) {
    consensus::register_benchmarks(c);
}

criterion_group!(benches, wire_codec_benches, signing_benches, consensus_benches);
criterion_main!(benches);
