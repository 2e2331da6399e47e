//! # Transaction Factory
//!
//! Builds unsigned transactions with network, max fee and deadline taken
//! from a validated [`TransactionConfig`], and signs them against its
//! generation hash.

use crate::config::TransactionConfig;
use crate::domain::body::{
    AggregateTransaction, DataModification, DataModificationCancel, Deploy, DriveClosure,
    EndDriveVerificationV2, Mosaic, PrepareBcDrive, ReplicatorOnboarding, StartExecute,
    TransactionBody,
};
use crate::domain::errors::TransactionError;
use crate::domain::header::{EmbeddedTransaction, Transaction, TransactionHeader};
use crate::domain::signing::{sign_transaction, SignedTransaction};
use shared_crypto::Ed25519KeyPair;
use shared_types::{Amount, BlsPublicKey, Deadline, Hash, PublicKey, StorageSize};
use sm_01_domain_model::VerificationOpinion;

/// Stamps headers from configuration.
#[derive(Debug, Clone)]
pub struct TransactionFactory {
    config: TransactionConfig,
}

impl TransactionFactory {
    pub fn new(config: TransactionConfig) -> Result<Self, TransactionError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TransactionConfig {
        &self.config
    }

    /// Unsigned header with a deadline `deadline_window` from now.
    pub fn header(&self) -> TransactionHeader {
        TransactionHeader::new(
            self.config.network_type,
            self.config.max_fee,
            Deadline::from_now(self.config.deadline_window),
        )
    }

    pub fn transaction(&self, body: TransactionBody) -> Transaction {
        Transaction::new(self.header(), body)
    }

    /// Inner transaction for an aggregate, on the configured network.
    pub fn embedded(&self, signer: PublicKey, body: TransactionBody) -> EmbeddedTransaction {
        EmbeddedTransaction::new(signer, self.config.network_type, body)
    }

    pub fn sign(
        &self,
        tx: Transaction,
        keypair: &Ed25519KeyPair,
    ) -> Result<SignedTransaction, TransactionError> {
        sign_transaction(tx, keypair, &self.config.generation_hash)
    }

    pub fn replicator_onboarding(
        &self,
        capacity: Amount,
        bls_public_key: BlsPublicKey,
    ) -> Transaction {
        self.transaction(TransactionBody::ReplicatorOnboarding(ReplicatorOnboarding {
            capacity,
            bls_public_key,
        }))
    }

    pub fn prepare_bc_drive(
        &self,
        drive_size: StorageSize,
        verification_fee_amount: Amount,
        replicator_count: u16,
    ) -> Transaction {
        self.transaction(TransactionBody::PrepareBcDrive(PrepareBcDrive {
            drive_size,
            verification_fee_amount,
            replicator_count,
        }))
    }

    pub fn data_modification(
        &self,
        drive_key: PublicKey,
        download_data_cdi: Hash,
        upload_size: StorageSize,
        feedback_fee_amount: Amount,
    ) -> Transaction {
        self.transaction(TransactionBody::DataModification(DataModification {
            drive_key,
            download_data_cdi,
            upload_size,
            feedback_fee_amount,
        }))
    }

    pub fn data_modification_cancel(
        &self,
        drive_key: PublicKey,
        data_modification_id: Hash,
    ) -> Transaction {
        self.transaction(TransactionBody::DataModificationCancel(DataModificationCancel {
            drive_key,
            data_modification_id,
        }))
    }

    pub fn drive_closure(&self, drive_key: PublicKey) -> Transaction {
        self.transaction(TransactionBody::DriveClosure(DriveClosure { drive_key }))
    }

    /// Fails when the opinions do not line up with the provers.
    pub fn end_drive_verification_v2(
        &self,
        drive_key: PublicKey,
        verification_trigger: Hash,
        provers: Vec<PublicKey>,
        opinions: Vec<VerificationOpinion>,
    ) -> Result<Transaction, TransactionError> {
        let body =
            EndDriveVerificationV2::new(drive_key, verification_trigger, provers, opinions)?;
        Ok(self.transaction(TransactionBody::EndDriveVerificationV2(body)))
    }

    pub fn deploy(
        &self,
        drive_key: PublicKey,
        owner: PublicKey,
        file_hash: Hash,
        vm_version: u64,
    ) -> Transaction {
        self.transaction(TransactionBody::Deploy(Deploy {
            drive_key,
            owner,
            file_hash,
            vm_version,
        }))
    }

    pub fn start_execute(
        &self,
        super_contract: PublicKey,
        function: impl Into<String>,
        mosaics: Vec<Mosaic>,
        data: Vec<u8>,
    ) -> Transaction {
        self.transaction(TransactionBody::StartExecute(StartExecute {
            super_contract,
            function: function.into(),
            mosaics,
            data,
        }))
    }

    pub fn aggregate_complete(&self, inner: Vec<EmbeddedTransaction>) -> Transaction {
        self.transaction(TransactionBody::AggregateComplete(AggregateTransaction::new(
            inner,
        )))
    }

    pub fn aggregate_bonded(&self, inner: Vec<EmbeddedTransaction>) -> Transaction {
        self.transaction(TransactionBody::AggregateBonded(AggregateTransaction::new(inner)))
    }
}
