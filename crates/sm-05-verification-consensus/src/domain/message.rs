//! # Opinion Message
//!
//! ```text
//! count:u16 | (prover:u16 | result:u8) × count      little-endian
//! ```
//!
//! Verifiers that agree on every result sign identical bytes, which lets
//! their signatures be checked as one aggregate.

use shared_crypto::{verify_bls, BlsKeyPair};
use shared_types::BlsPublicKey;
use sm_01_domain_model::{VerificationOpinion, VerificationResult};

/// Bytes a verifier signs for its results.
///
/// Callers keep `results.len()` within `u16`; the session rejects larger
/// rounds before signing.
pub fn opinion_message(results: &[VerificationResult]) -> Vec<u8> {
    let mut message = Vec::with_capacity(2 + results.len() * 3);
    message.extend_from_slice(&(results.len() as u16).to_le_bytes());
    for result in results {
        message.extend_from_slice(&result.prover.to_le_bytes());
        message.push(u8::from(result.result));
    }
    message
}

/// Sign `results` as verifier `verifier`.
pub fn sign_opinion(
    keypair: &BlsKeyPair,
    verifier: u16,
    results: Vec<VerificationResult>,
) -> VerificationOpinion {
    let bls_signature = keypair.sign(&opinion_message(&results));
    VerificationOpinion {
        verifier,
        bls_signature,
        results,
    }
}

/// Check an opinion's signature against the verifier's BLS key.
pub fn verify_opinion(opinion: &VerificationOpinion, public_key: &BlsPublicKey) -> bool {
    verify_bls(
        &opinion_message(&opinion.results),
        &opinion.bls_signature,
        public_key,
    )
}
