//! # Transaction Header
//!
//! Every top-level transaction is one `TransactionHeader` plus a
//! `TransactionBody`. Inner transactions of an aggregate keep only the
//! signer and network; fee, deadline and signature belong to the envelope.

use crate::domain::body::TransactionBody;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_types::{pack_version, Amount, Deadline, EntityType, NetworkType, PublicKey, Signature};

/// Common header of a top-level transaction.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHeader {
    /// Ed25519 signature; all-zero until signed.
    #[serde_as(as = "Bytes")]
    pub signature: Signature,
    /// Signer public key; all-zero until signed.
    pub signer: PublicKey,
    pub network_type: NetworkType,
    pub max_fee: Amount,
    pub deadline: Deadline,
}

impl TransactionHeader {
    /// Unsigned header.
    pub fn new(network_type: NetworkType, max_fee: Amount, deadline: Deadline) -> Self {
        Self {
            signature: [0u8; 64],
            signer: [0u8; 32],
            network_type,
            max_fee,
            deadline,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signature != [0u8; 64]
    }
}

/// A top-level transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub header: TransactionHeader,
    pub body: TransactionBody,
}

impl Transaction {
    pub fn new(header: TransactionHeader, body: TransactionBody) -> Self {
        Self { header, body }
    }

    pub fn entity_type(&self) -> EntityType {
        self.body.entity_type()
    }

    /// Packed header `version` word.
    pub fn version(&self) -> u32 {
        let entity = self.entity_type();
        pack_version(self.header.network_type, entity.current_version())
    }
}

/// An inner transaction of an aggregate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedTransaction {
    pub signer: PublicKey,
    pub network_type: NetworkType,
    pub body: TransactionBody,
}

impl EmbeddedTransaction {
    pub fn new(signer: PublicKey, network_type: NetworkType, body: TransactionBody) -> Self {
        Self {
            signer,
            network_type,
            body,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.body.entity_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::body::DriveClosure;

    #[test]
    fn test_new_header_is_unsigned() {
        let header = TransactionHeader::new(NetworkType::MijinTest, Amount(10), Deadline(5));
        assert!(!header.is_signed());
        assert_eq!(header.signer, [0u8; 32]);
    }

    #[test]
    fn test_version_word_from_body() {
        let tx = Transaction::new(
            TransactionHeader::new(NetworkType::MijinTest, Amount(0), Deadline(0)),
            TransactionBody::DriveClosure(DriveClosure { drive_key: [1; 32] }),
        );
        assert_eq!(tx.entity_type(), EntityType::DriveClosure);
        assert_eq!(tx.version(), 0x9000_0001);
    }
}
