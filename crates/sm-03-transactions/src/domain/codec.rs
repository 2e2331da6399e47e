//! # Transaction Codec
//!
//! Typed `encode`/`decode` over the table codec. Encoding is deterministic:
//! equal transactions always produce identical bytes, which the signature
//! depends on.
//!
//! Decoding reads the header first to learn the type, then reads the whole
//! table with that type's layout. Unknown types, unknown networks and
//! versions other than the current one are `SchemaMismatch`.

use crate::domain::body::{
    AggregateTransaction, Cosignature, DataModification, DataModificationCancel, Deploy,
    DriveClosure, EndDriveVerificationV2, Mosaic, PrepareBcDrive, ReplicatorOnboarding,
    StartExecute, TransactionBody,
};
use crate::domain::errors::TransactionError;
use crate::domain::header::{EmbeddedTransaction, Transaction, TransactionHeader};
use crate::domain::layouts::{
    embedded_layout, embedded_slot, header_slot, layout, EMBEDDED_HEADER_LAYOUT, HEADER_LAYOUT,
};
use shared_types::{
    pack_version, unpack_version, Amount, BlsPublicKey, BlsSignature, Deadline, EntityType,
    NetworkType, PublicKey, StorageSize,
};
use sm_01_domain_model::{VerificationOpinion, VerificationResult};
use sm_02_wire_codec::{
    read_table, CodecError, DecodedTable, EncodedTable, FieldAccess, RowView, Slot, TableWriter,
    Value,
};
use tracing::debug;

// =============================================================================
// ENCODE
// =============================================================================

/// Encode a top-level transaction.
pub fn encode(tx: &Transaction) -> Result<Vec<u8>, TransactionError> {
    Ok(encode_table(tx)?.into_bytes())
}

/// Encode a top-level transaction, keeping the field offsets.
pub fn encode_table(tx: &Transaction) -> Result<EncodedTable, TransactionError> {
    let entity = tx.entity_type();
    let layout = layout(entity);
    let mut writer = TableWriter::new(layout);

    writer
        .set(header_slot::SIGNATURE, fixed(&tx.header.signature))?
        .set(header_slot::SIGNER, fixed(&tx.header.signer))?
        .set(header_slot::VERSION, Value::U32(tx.version()))?
        .set(header_slot::TYPE, Value::U16(entity.as_u16()))?
        .set(header_slot::MAX_FEE, Value::U64(tx.header.max_fee.value()))?
        .set(header_slot::DEADLINE, Value::U64(tx.header.deadline.value()))?;
    write_body(&mut writer, layout.body_start(), &tx.body)?;

    let table = writer.finish()?;
    debug!(entity = ?entity, size = table.bytes.len(), "Transaction encoded");
    Ok(table)
}

/// Encode an aggregate inner transaction.
pub fn encode_embedded(tx: &EmbeddedTransaction) -> Result<Vec<u8>, TransactionError> {
    let entity = tx.entity_type();
    reject_nested_aggregate(entity)?;
    let layout = embedded_layout(entity);
    let mut writer = TableWriter::new(layout);

    writer
        .set(embedded_slot::SIGNER, fixed(&tx.signer))?
        .set(
            embedded_slot::VERSION,
            Value::U32(pack_version(tx.network_type, entity.current_version())),
        )?
        .set(embedded_slot::TYPE, Value::U16(entity.as_u16()))?;
    write_body(&mut writer, layout.body_start(), &tx.body)?;

    Ok(writer.finish()?.into_bytes())
}

fn write_body(
    writer: &mut TableWriter,
    start: Slot,
    body: &TransactionBody,
) -> Result<(), TransactionError> {
    for (index, value) in body_values(body)?.into_iter().enumerate() {
        writer.set(start + index, value)?;
    }
    Ok(())
}

/// Body values in declared field order.
fn body_values(body: &TransactionBody) -> Result<Vec<Value>, TransactionError> {
    let values = match body {
        TransactionBody::ReplicatorOnboarding(b) => vec![
            Value::U64(b.capacity.value()),
            fixed(&b.bls_public_key.bytes),
        ],
        TransactionBody::PrepareBcDrive(b) => vec![
            Value::U64(b.drive_size.value()),
            Value::U64(b.verification_fee_amount.value()),
            Value::U16(b.replicator_count),
        ],
        TransactionBody::DataModification(b) => vec![
            fixed(&b.drive_key),
            fixed(&b.download_data_cdi),
            Value::U64(b.upload_size.value()),
            Value::U64(b.feedback_fee_amount.value()),
        ],
        TransactionBody::DataModificationCancel(b) => {
            vec![fixed(&b.drive_key), fixed(&b.data_modification_id)]
        }
        TransactionBody::DriveClosure(b) => vec![fixed(&b.drive_key)],
        TransactionBody::EndDriveVerificationV2(b) => vec![
            fixed(b.drive_key()),
            fixed(b.verification_trigger()),
            Value::Array(b.provers().iter().map(|p| p.to_vec()).collect()),
            Value::Tables(b.opinions().iter().map(opinion_row).collect()),
        ],
        TransactionBody::Deploy(b) => vec![
            fixed(&b.drive_key),
            fixed(&b.owner),
            fixed(&b.file_hash),
            Value::U64(b.vm_version),
        ],
        TransactionBody::StartExecute(b) => vec![
            fixed(&b.super_contract),
            Value::Bytes(b.function.as_bytes().to_vec()),
            Value::Tables(
                b.mosaics
                    .iter()
                    .map(|m| vec![Value::U64(m.id), Value::U64(m.amount.value())])
                    .collect(),
            ),
            Value::Bytes(b.data.clone()),
        ],
        TransactionBody::AggregateComplete(b) | TransactionBody::AggregateBonded(b) => vec![
            Value::Entities(
                b.transactions
                    .iter()
                    .map(encode_embedded)
                    .collect::<Result<Vec<_>, TransactionError>>()?,
            ),
            Value::Tables(
                b.cosignatures
                    .iter()
                    .map(|c| vec![fixed(&c.signer), fixed(&c.signature)])
                    .collect(),
            ),
        ],
    };
    Ok(values)
}

fn opinion_row(opinion: &VerificationOpinion) -> Vec<Value> {
    vec![
        Value::U16(opinion.verifier),
        fixed(&opinion.bls_signature.bytes),
        Value::Tables(
            opinion
                .results
                .iter()
                .map(|r| vec![Value::U16(r.prover), Value::U8(u8::from(r.result))])
                .collect(),
        ),
    ]
}

fn fixed(bytes: &[u8]) -> Value {
    Value::Fixed(bytes.to_vec())
}

// =============================================================================
// DECODE
// =============================================================================

/// Decode a top-level transaction. The buffer must hold exactly one table.
pub fn decode(bytes: &[u8]) -> Result<Transaction, TransactionError> {
    let header = read_table(HEADER_LAYOUT, bytes)?;
    require_exact_size(&header, bytes)?;
    let (entity, network_type) =
        read_tags(&header, header_slot::VERSION, header_slot::TYPE)?;

    let layout = layout(entity);
    let table = read_table(layout, bytes)?;
    let header = TransactionHeader {
        signature: table.get_fixed::<64>(header_slot::SIGNATURE)?,
        signer: table.get_fixed::<32>(header_slot::SIGNER)?,
        network_type,
        max_fee: Amount(table.get_u64(header_slot::MAX_FEE)?),
        deadline: Deadline(table.get_u64(header_slot::DEADLINE)?),
    };
    let body = read_body(entity, &table, layout.body_start())?;

    debug!(entity = ?entity, size = bytes.len(), "Transaction decoded");
    Ok(Transaction { header, body })
}

/// Decode an aggregate inner transaction.
pub fn decode_embedded(bytes: &[u8]) -> Result<EmbeddedTransaction, TransactionError> {
    let header = read_table(EMBEDDED_HEADER_LAYOUT, bytes)?;
    require_exact_size(&header, bytes)?;
    let (entity, network_type) =
        read_tags(&header, embedded_slot::VERSION, embedded_slot::TYPE)?;
    reject_nested_aggregate(entity)?;

    let layout = embedded_layout(entity);
    let table = read_table(layout, bytes)?;
    Ok(EmbeddedTransaction {
        signer: table.get_fixed::<32>(embedded_slot::SIGNER)?,
        network_type,
        body: read_body(entity, &table, layout.body_start())?,
    })
}

fn require_exact_size(header: &DecodedTable, bytes: &[u8]) -> Result<(), TransactionError> {
    if header.size() != bytes.len() {
        return Err(CodecError::SizeMismatch {
            table: header.layout().name,
            declared: header.size(),
            actual: bytes.len(),
        }
        .into());
    }
    Ok(())
}

/// Resolve the type tag and version word.
fn read_tags(
    header: &DecodedTable,
    version_slot: Slot,
    type_slot: Slot,
) -> Result<(EntityType, NetworkType), TransactionError> {
    let raw_type = header.get_u16(type_slot)?;
    let entity = EntityType::from_u16(raw_type).ok_or_else(|| {
        TransactionError::schema(format!("unknown transaction type 0x{raw_type:04X}"))
    })?;

    let (network, version) = unpack_version(header.get_u32(version_slot)?);
    let network_type = NetworkType::try_from(network)
        .map_err(|e| TransactionError::schema(e.to_string()))?;
    if version != u32::from(entity.current_version()) {
        return Err(TransactionError::schema(format!(
            "unsupported version {version} for {entity:?}"
        )));
    }
    Ok((entity, network_type))
}

fn reject_nested_aggregate(entity: EntityType) -> Result<(), TransactionError> {
    if entity.is_aggregate() {
        return Err(TransactionError::schema(format!(
            "{entity:?} cannot be embedded in an aggregate"
        )));
    }
    Ok(())
}

fn read_body(
    entity: EntityType,
    table: &DecodedTable,
    start: Slot,
) -> Result<TransactionBody, TransactionError> {
    let body = match entity {
        EntityType::ReplicatorOnboarding => {
            TransactionBody::ReplicatorOnboarding(ReplicatorOnboarding {
                capacity: Amount(table.get_u64(start)?),
                bls_public_key: BlsPublicKey::new(table.get_fixed(start + 1)?),
            })
        }
        EntityType::PrepareBcDrive => TransactionBody::PrepareBcDrive(PrepareBcDrive {
            drive_size: StorageSize(table.get_u64(start)?),
            verification_fee_amount: Amount(table.get_u64(start + 1)?),
            replicator_count: table.get_u16(start + 2)?,
        }),
        EntityType::DataModification => TransactionBody::DataModification(DataModification {
            drive_key: table.get_fixed(start)?,
            download_data_cdi: table.get_fixed(start + 1)?,
            upload_size: StorageSize(table.get_u64(start + 2)?),
            feedback_fee_amount: Amount(table.get_u64(start + 3)?),
        }),
        EntityType::DataModificationCancel => {
            TransactionBody::DataModificationCancel(DataModificationCancel {
                drive_key: table.get_fixed(start)?,
                data_modification_id: table.get_fixed(start + 1)?,
            })
        }
        EntityType::DriveClosure => TransactionBody::DriveClosure(DriveClosure {
            drive_key: table.get_fixed(start)?,
        }),
        EntityType::EndDriveVerificationV2 => {
            let provers = table
                .get_array(start + 2)?
                .iter()
                .map(|p| to_key(table.table_name(), p))
                .collect::<Result<Vec<_>, _>>()?;
            let opinions = table
                .get_rows(start + 3)?
                .iter()
                .map(read_opinion)
                .collect::<Result<Vec<_>, _>>()?;
            TransactionBody::EndDriveVerificationV2(EndDriveVerificationV2::from_wire(
                table.get_fixed(start)?,
                table.get_fixed(start + 1)?,
                provers,
                opinions,
            ))
        }
        EntityType::Deploy => TransactionBody::Deploy(Deploy {
            drive_key: table.get_fixed(start)?,
            owner: table.get_fixed(start + 1)?,
            file_hash: table.get_fixed(start + 2)?,
            vm_version: table.get_u64(start + 3)?,
        }),
        EntityType::StartExecute => {
            let function = String::from_utf8(table.get_bytes(start + 1)?.to_vec())
                .map_err(|_| TransactionError::schema("StartExecute function is not UTF-8"))?;
            let mosaics = table
                .get_rows(start + 2)?
                .iter()
                .map(|row| {
                    Ok(Mosaic {
                        id: row.get_u64(0)?,
                        amount: Amount(row.get_u64(1)?),
                    })
                })
                .collect::<Result<Vec<_>, CodecError>>()?;
            TransactionBody::StartExecute(StartExecute {
                super_contract: table.get_fixed(start)?,
                function,
                mosaics,
                data: table.get_bytes(start + 3)?.to_vec(),
            })
        }
        EntityType::AggregateComplete => {
            TransactionBody::AggregateComplete(read_aggregate(table, start)?)
        }
        EntityType::AggregateBonded => {
            TransactionBody::AggregateBonded(read_aggregate(table, start)?)
        }
    };
    Ok(body)
}

fn read_opinion(row: &RowView<'_>) -> Result<VerificationOpinion, CodecError> {
    let results = row
        .get_rows(2)?
        .iter()
        .map(|entry| {
            let result = match entry.get_u8(1)? {
                0 => false,
                1 => true,
                other => {
                    return Err(CodecError::SchemaMismatch(format!(
                        "verification result byte {other}"
                    )))
                }
            };
            Ok(VerificationResult {
                prover: entry.get_u16(0)?,
                result,
            })
        })
        .collect::<Result<Vec<_>, CodecError>>()?;
    Ok(VerificationOpinion {
        verifier: row.get_u16(0)?,
        bls_signature: BlsSignature::new(row.get_fixed(1)?),
        results,
    })
}

fn read_aggregate(
    table: &DecodedTable,
    start: Slot,
) -> Result<AggregateTransaction, TransactionError> {
    let transactions = table
        .get_entities(start)?
        .iter()
        .map(|raw| decode_embedded(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let cosignatures = table
        .get_rows(start + 1)?
        .iter()
        .map(|row| {
            Ok(Cosignature {
                signer: row.get_fixed(0)?,
                signature: row.get_fixed(1)?,
            })
        })
        .collect::<Result<Vec<_>, CodecError>>()?;
    Ok(AggregateTransaction {
        transactions,
        cosignatures,
    })
}

fn to_key(table: &'static str, bytes: &[u8]) -> Result<PublicKey, CodecError> {
    PublicKey::try_from(bytes).map_err(|_| CodecError::KindMismatch {
        table,
        field: "provers",
        expected: "array(32)".to_string(),
    })
}
