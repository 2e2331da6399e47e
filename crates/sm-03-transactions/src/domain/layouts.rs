//! # Transaction Layouts
//!
//! Every transaction table is the common header followed by its body.
//!
//! ## Header
//!
//! | Offset | Field | Width |
//! |--------|-------|-------|
//! | 0 | size | 4 |
//! | 4 | signature | 64 |
//! | 68 | signer | 32 |
//! | 100 | version | 4 |
//! | 104 | type | 2 |
//! | 106 | maxFee | 8 |
//! | 114 | deadline | 8 |
//! | 122 | body | |
//!
//! Inner transactions of an aggregate carry a shorter header:
//! `size | signer | version | type` (42 bytes).
//!
//! New optional fields are only ever appended at the end of a body.

use shared_types::{EntityType, BLS_PUBLIC_KEY_SIZE, BLS_SIGNATURE_SIZE};
use sm_02_wire_codec::{Field, FieldKind, Layout, Slot};

const KEY: FieldKind = FieldKind::Fixed(32);
const SIGNATURE: FieldKind = FieldKind::Fixed(64);

// =============================================================================
// HEADERS
// =============================================================================

pub(crate) const HEADER: &[Field] = &[
    Field::new("signature", SIGNATURE),
    Field::new("signer", KEY),
    Field::new("version", FieldKind::U32),
    Field::new("type", FieldKind::U16),
    Field::new("maxFee", FieldKind::U64),
    Field::new("deadline", FieldKind::U64),
];

pub(crate) mod header_slot {
    use super::Slot;

    pub const SIGNATURE: Slot = 0;
    pub const SIGNER: Slot = 1;
    pub const VERSION: Slot = 2;
    pub const TYPE: Slot = 3;
    pub const MAX_FEE: Slot = 4;
    pub const DEADLINE: Slot = 5;
}

pub(crate) const EMBEDDED_HEADER: &[Field] = &[
    Field::new("signer", KEY),
    Field::new("version", FieldKind::U32),
    Field::new("type", FieldKind::U16),
];

pub(crate) mod embedded_slot {
    use super::Slot;

    pub const SIGNER: Slot = 0;
    pub const VERSION: Slot = 1;
    pub const TYPE: Slot = 2;
}

/// Header fields only, for peeking at the type before decoding a body.
pub(crate) const HEADER_LAYOUT: Layout = Layout::table("TransactionHeader", HEADER);
pub(crate) const EMBEDDED_HEADER_LAYOUT: Layout =
    Layout::table("EmbeddedTransactionHeader", EMBEDDED_HEADER);

/// Encoded size of the common header, including the size prefix.
pub const HEADER_SIZE: usize = 122;

/// Encoded size of the embedded header, including the size prefix.
pub const EMBEDDED_HEADER_SIZE: usize = 42;

/// Signing payloads start at the `version` field.
pub const SIGNING_PAYLOAD_OFFSET: usize = 100;

// =============================================================================
// BODIES
// =============================================================================

pub(crate) const REPLICATOR_ONBOARDING: &[Field] = &[
    Field::new("capacity", FieldKind::U64),
    Field::new("blsPublicKey", FieldKind::Fixed(BLS_PUBLIC_KEY_SIZE)),
];

pub(crate) const PREPARE_BC_DRIVE: &[Field] = &[
    Field::new("driveSize", FieldKind::U64),
    Field::new("verificationFeeAmount", FieldKind::U64),
    Field::new("replicatorCount", FieldKind::U16),
];

pub(crate) const DATA_MODIFICATION: &[Field] = &[
    Field::new("driveKey", KEY),
    Field::new("downloadDataCdi", KEY),
    Field::new("uploadSize", FieldKind::U64),
    Field::new("feedbackFeeAmount", FieldKind::U64),
];

pub(crate) const DATA_MODIFICATION_CANCEL: &[Field] = &[
    Field::new("driveKey", KEY),
    Field::new("dataModificationId", KEY),
];

pub(crate) const DRIVE_CLOSURE: &[Field] = &[Field::new("driveKey", KEY)];

pub(crate) const VERIFICATION_RESULT: &[Field] = &[
    Field::new("prover", FieldKind::U16),
    Field::new("result", FieldKind::U8),
];

pub(crate) const VERIFICATION_OPINION: &[Field] = &[
    Field::new("verifier", FieldKind::U16),
    Field::new("blsSignature", FieldKind::Fixed(BLS_SIGNATURE_SIZE)),
    Field::new("results", FieldKind::Tables(VERIFICATION_RESULT)),
];

pub(crate) const END_DRIVE_VERIFICATION_V2: &[Field] = &[
    Field::new("driveKey", KEY),
    Field::new("verificationTrigger", KEY),
    Field::new("provers", FieldKind::Array(32)),
    Field::new("opinions", FieldKind::Tables(VERIFICATION_OPINION)),
];

pub(crate) const DEPLOY: &[Field] = &[
    Field::new("driveKey", KEY),
    Field::new("owner", KEY),
    Field::new("fileHash", KEY),
    Field::new("vmVersion", FieldKind::U64),
];

pub(crate) const MOSAIC: &[Field] = &[
    Field::new("id", FieldKind::U64),
    Field::new("amount", FieldKind::U64),
];

pub(crate) const START_EXECUTE: &[Field] = &[
    Field::new("superContract", KEY),
    Field::new("function", FieldKind::Bytes),
    Field::new("mosaics", FieldKind::Tables(MOSAIC)),
    Field::new("data", FieldKind::Bytes),
];

pub(crate) const COSIGNATURE: &[Field] = &[
    Field::new("signer", KEY),
    Field::new("signature", SIGNATURE),
];

pub(crate) const AGGREGATE: &[Field] = &[
    Field::new("transactions", FieldKind::Entities),
    Field::new("cosignatures", FieldKind::Tables(COSIGNATURE)),
];

/// Body slot of the aggregate cosignature list.
pub(crate) const AGGREGATE_COSIGNATURES: Slot = 1;

fn body_fields(entity: EntityType) -> &'static [Field] {
    match entity {
        EntityType::ReplicatorOnboarding => REPLICATOR_ONBOARDING,
        EntityType::PrepareBcDrive => PREPARE_BC_DRIVE,
        EntityType::DataModification => DATA_MODIFICATION,
        EntityType::DataModificationCancel => DATA_MODIFICATION_CANCEL,
        EntityType::DriveClosure => DRIVE_CLOSURE,
        EntityType::EndDriveVerificationV2 => END_DRIVE_VERIFICATION_V2,
        EntityType::Deploy => DEPLOY,
        EntityType::StartExecute => START_EXECUTE,
        EntityType::AggregateComplete | EntityType::AggregateBonded => AGGREGATE,
    }
}

fn layout_name(entity: EntityType) -> &'static str {
    match entity {
        EntityType::ReplicatorOnboarding => "ReplicatorOnboarding",
        EntityType::PrepareBcDrive => "PrepareBcDrive",
        EntityType::DataModification => "DataModification",
        EntityType::DataModificationCancel => "DataModificationCancel",
        EntityType::DriveClosure => "DriveClosure",
        EntityType::EndDriveVerificationV2 => "EndDriveVerificationV2",
        EntityType::Deploy => "Deploy",
        EntityType::StartExecute => "StartExecute",
        EntityType::AggregateComplete => "AggregateComplete",
        EntityType::AggregateBonded => "AggregateBonded",
    }
}

/// Full layout of a top-level transaction.
pub fn layout(entity: EntityType) -> Layout {
    Layout::new(layout_name(entity), HEADER, body_fields(entity))
}

/// Full layout of an aggregate inner transaction.
pub fn embedded_layout(entity: EntityType) -> Layout {
    Layout::new(layout_name(entity), EMBEDDED_HEADER, body_fields(entity))
}
