//! # Aggregate Builder
//!
//! Collects inner transactions, stamps the outer header through a
//! [`TransactionFactory`] and signs it as the initiator. The result is a
//! [`PendingAggregate`] whose hash is fixed from that point on.

use crate::domain::errors::CosignError;
use crate::domain::pending::PendingAggregate;
use shared_crypto::Ed25519KeyPair;
use sm_03_transactions::{EmbeddedTransaction, Transaction, TransactionFactory};

/// Which aggregate variant to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateKind {
    /// All cosignatures are attached before announcing.
    Complete,
    /// Announced first, cosignatures collected by the network.
    Bonded,
}

/// Inner transactions of an aggregate under construction.
#[derive(Clone, Debug)]
pub struct AggregateBuilder {
    kind: AggregateKind,
    transactions: Vec<EmbeddedTransaction>,
}

impl AggregateBuilder {
    pub fn new(kind: AggregateKind) -> Self {
        Self {
            kind,
            transactions: Vec::new(),
        }
    }

    pub fn complete() -> Self {
        Self::new(AggregateKind::Complete)
    }

    pub fn bonded() -> Self {
        Self::new(AggregateKind::Bonded)
    }

    pub fn kind(&self) -> AggregateKind {
        self.kind
    }

    /// Append an inner transaction. Order is preserved on the wire.
    pub fn add(mut self, tx: EmbeddedTransaction) -> Self {
        self.transactions.push(tx);
        self
    }

    pub fn add_all(mut self, txs: impl IntoIterator<Item = EmbeddedTransaction>) -> Self {
        self.transactions.extend(txs);
        self
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// The unsigned aggregate.
    pub fn build(self, factory: &TransactionFactory) -> Result<Transaction, CosignError> {
        if self.transactions.is_empty() {
            return Err(CosignError::EmptyAggregate);
        }
        Ok(match self.kind {
            AggregateKind::Complete => factory.aggregate_complete(self.transactions),
            AggregateKind::Bonded => factory.aggregate_bonded(self.transactions),
        })
    }

    /// Build and sign as `initiator`, opening cosignature collection.
    pub fn sign(
        self,
        factory: &TransactionFactory,
        initiator: &Ed25519KeyPair,
    ) -> Result<PendingAggregate, CosignError> {
        let tx = self.build(factory)?;
        let signed = factory.sign(tx, initiator)?;
        PendingAggregate::from_signed(signed, factory.config().generation_hash)
    }
}
