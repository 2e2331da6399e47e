//! # Verification Records
//!
//! During a verification round every verifier attests to a pass/fail result
//! for every prover. Entry `i` of an opinion's results refers to prover `i`.

use crate::domain::errors::ModelError;
use serde::{Deserialize, Serialize};
use shared_types::BlsSignature;

/// One verifier's verdict on one prover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Index into the round's prover list.
    pub prover: u16,
    /// `true` if the prover passed.
    pub result: bool,
}

/// A verifier's signed results for a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOpinion {
    /// Index of the verifier in the round's prover list.
    pub verifier: u16,
    /// BLS signature over the encoded results.
    pub bls_signature: BlsSignature,
    /// One result per prover, in prover order.
    pub results: Vec<VerificationResult>,
}

impl VerificationOpinion {
    /// Number of provers this opinion covers.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Provers this verifier marked as failed.
    pub fn failed_provers(&self) -> impl Iterator<Item = u16> + '_ {
        self.results.iter().filter(|r| !r.result).map(|r| r.prover)
    }
}

/// Check that a round's opinions line up with its provers.
///
/// Requires a non-empty prover list, one opinion per prover, and results of
/// the same length as the prover list in every opinion.
pub fn check_opinion_shapes(
    prover_count: usize,
    opinions: &[VerificationOpinion],
) -> Result<(), ModelError> {
    if prover_count == 0 {
        return Err(ModelError::EmptyProverList);
    }
    if opinions.len() != prover_count {
        return Err(ModelError::ConsensusShapeMismatch {
            context: "opinion count",
            expected: prover_count,
            actual: opinions.len(),
        });
    }
    for opinion in opinions {
        if opinion.results.len() != prover_count {
            return Err(ModelError::ConsensusShapeMismatch {
                context: "results length",
                expected: prover_count,
                actual: opinion.results.len(),
            });
        }
    }
    Ok(())
}
