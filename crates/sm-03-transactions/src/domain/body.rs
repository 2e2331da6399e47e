//! # Transaction Bodies
//!
//! One struct per transaction type. The entity type and version of a
//! transaction are derived from its body variant and never stored.

use crate::domain::header::EmbeddedTransaction;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_types::{
    Amount, BlsPublicKey, EntityType, Hash, PublicKey, Signature, StorageSize,
};
use sm_01_domain_model::{check_opinion_shapes, ModelError, VerificationOpinion};

/// Replicator stakes capacity and registers its BLS key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicatorOnboarding {
    pub capacity: Amount,
    pub bls_public_key: BlsPublicKey,
}

/// Owner rents a new drive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareBcDrive {
    pub drive_size: StorageSize,
    pub verification_fee_amount: Amount,
    pub replicator_count: u16,
}

/// Filesystem change on a drive. Its transaction hash becomes the id of the
/// new active modification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataModification {
    pub drive_key: PublicKey,
    pub download_data_cdi: Hash,
    pub upload_size: StorageSize,
    pub feedback_fee_amount: Amount,
}

/// Owner cancels an active modification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataModificationCancel {
    pub drive_key: PublicKey,
    pub data_modification_id: Hash,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveClosure {
    pub drive_key: PublicKey,
}

/// Result of a verification round, packaged with every verifier's opinion.
///
/// Built through [`EndDriveVerificationV2::new`], which enforces one opinion
/// per prover and one result per prover in each opinion. Decoding keeps
/// whatever the buffer holds; call [`EndDriveVerificationV2::validate`] to
/// check a decoded value. Deserialization applies the same checks as `new`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EndDriveVerificationRecord")]
pub struct EndDriveVerificationV2 {
    drive_key: PublicKey,
    verification_trigger: Hash,
    provers: Vec<PublicKey>,
    opinions: Vec<VerificationOpinion>,
}

#[derive(Deserialize)]
struct EndDriveVerificationRecord {
    drive_key: PublicKey,
    verification_trigger: Hash,
    provers: Vec<PublicKey>,
    opinions: Vec<VerificationOpinion>,
}

impl TryFrom<EndDriveVerificationRecord> for EndDriveVerificationV2 {
    type Error = ModelError;

    fn try_from(record: EndDriveVerificationRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.drive_key,
            record.verification_trigger,
            record.provers,
            record.opinions,
        )
    }
}

impl EndDriveVerificationV2 {
    pub fn new(
        drive_key: PublicKey,
        verification_trigger: Hash,
        provers: Vec<PublicKey>,
        opinions: Vec<VerificationOpinion>,
    ) -> Result<Self, ModelError> {
        check_opinion_shapes(provers.len(), &opinions)?;
        Ok(Self::from_wire(drive_key, verification_trigger, provers, opinions))
    }

    pub(crate) fn from_wire(
        drive_key: PublicKey,
        verification_trigger: Hash,
        provers: Vec<PublicKey>,
        opinions: Vec<VerificationOpinion>,
    ) -> Self {
        Self {
            drive_key,
            verification_trigger,
            provers,
            opinions,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        check_opinion_shapes(self.provers.len(), &self.opinions)
    }

    pub fn drive_key(&self) -> &PublicKey {
        &self.drive_key
    }

    pub fn verification_trigger(&self) -> &Hash {
        &self.verification_trigger
    }

    pub fn provers(&self) -> &[PublicKey] {
        &self.provers
    }

    pub fn opinions(&self) -> &[VerificationOpinion] {
        &self.opinions
    }
}

/// Deploys a supercontract stored on a drive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deploy {
    pub drive_key: PublicKey,
    pub owner: PublicKey,
    pub file_hash: Hash,
    pub vm_version: u64,
}

/// Mosaic attached to a supercontract call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mosaic {
    pub id: u64,
    pub amount: Amount,
}

/// Calls a function on a deployed supercontract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartExecute {
    pub super_contract: PublicKey,
    pub function: String,
    pub mosaics: Vec<Mosaic>,
    pub data: Vec<u8>,
}

/// Cosignature over an aggregate hash.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cosignature {
    pub signer: PublicKey,
    #[serde_as(as = "Bytes")]
    pub signature: Signature,
}

/// Inner transactions plus the cosignatures collected so far.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTransaction {
    pub transactions: Vec<EmbeddedTransaction>,
    pub cosignatures: Vec<Cosignature>,
}

impl AggregateTransaction {
    pub fn new(transactions: Vec<EmbeddedTransaction>) -> Self {
        Self {
            transactions,
            cosignatures: Vec::new(),
        }
    }
}

/// Variant payload of a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionBody {
    ReplicatorOnboarding(ReplicatorOnboarding),
    PrepareBcDrive(PrepareBcDrive),
    DataModification(DataModification),
    DataModificationCancel(DataModificationCancel),
    DriveClosure(DriveClosure),
    EndDriveVerificationV2(EndDriveVerificationV2),
    Deploy(Deploy),
    StartExecute(StartExecute),
    AggregateComplete(AggregateTransaction),
    AggregateBonded(AggregateTransaction),
}

impl TransactionBody {
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::ReplicatorOnboarding(_) => EntityType::ReplicatorOnboarding,
            Self::PrepareBcDrive(_) => EntityType::PrepareBcDrive,
            Self::DataModification(_) => EntityType::DataModification,
            Self::DataModificationCancel(_) => EntityType::DataModificationCancel,
            Self::DriveClosure(_) => EntityType::DriveClosure,
            Self::EndDriveVerificationV2(_) => EntityType::EndDriveVerificationV2,
            Self::Deploy(_) => EntityType::Deploy,
            Self::StartExecute(_) => EntityType::StartExecute,
            Self::AggregateComplete(_) => EntityType::AggregateComplete,
            Self::AggregateBonded(_) => EntityType::AggregateBonded,
        }
    }

    /// The aggregate payload, for either aggregate type.
    pub fn as_aggregate(&self) -> Option<&AggregateTransaction> {
        match self {
            Self::AggregateComplete(aggregate) | Self::AggregateBonded(aggregate) => {
                Some(aggregate)
            }
            _ => None,
        }
    }

    pub fn as_aggregate_mut(&mut self) -> Option<&mut AggregateTransaction> {
        match self {
            Self::AggregateComplete(aggregate) | Self::AggregateBonded(aggregate) => {
                Some(aggregate)
            }
            _ => None,
        }
    }
}
