//! # Table Writer
//!
//! Fields may be set in any order; `finish` always serialises them in the
//! layout's declared order, writing defaults for fields never set. One
//! writer produces one table and holds no state beyond it.

use crate::domain::errors::CodecError;
use crate::domain::schema::{Field, FieldKind, Layout, Slot, SIZE_PREFIX};
use crate::domain::value::Value;
use tracing::trace;

/// Encoded table bytes plus the offset at which each field starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedTable {
    pub bytes: Vec<u8>,
    pub offsets: Vec<usize>,
}

impl EncodedTable {
    pub fn offset(&self, slot: Slot) -> Option<usize> {
        self.offsets.get(slot).copied()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Builds a single table.
#[derive(Clone, Debug)]
pub struct TableWriter {
    layout: Layout,
    values: Vec<Option<Value>>,
}

impl TableWriter {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            values: vec![None; layout.field_count()],
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Set a field. A later write to the same slot replaces the earlier one.
    pub fn set(&mut self, slot: Slot, value: Value) -> Result<&mut Self, CodecError> {
        let field = self.layout.field(slot).ok_or(CodecError::UnknownSlot {
            table: self.layout.name,
            slot,
        })?;
        value.check(self.layout.name, field)?;
        self.values[slot] = Some(value);
        Ok(self)
    }

    /// Set a field by name.
    pub fn set_named(&mut self, name: &str, value: Value) -> Result<&mut Self, CodecError> {
        let slot = self.layout.slot_of(name).ok_or_else(|| {
            CodecError::SchemaMismatch(format!("{} has no field {name}", self.layout.name))
        })?;
        self.set(slot, value)
    }

    pub fn is_set(&self, slot: Slot) -> bool {
        matches!(self.values.get(slot), Some(Some(_)))
    }

    /// Serialise every field in declared order.
    pub fn finish(self) -> Result<EncodedTable, CodecError> {
        let mut bytes = vec![0u8; SIZE_PREFIX];
        let mut offsets = Vec::with_capacity(self.values.len());

        for (field, value) in self.layout.fields().zip(self.values) {
            offsets.push(bytes.len());
            let value = value.unwrap_or_else(|| Value::default_for(field.kind));
            write_value(&mut bytes, self.layout.name, field, &value)?;
        }

        let size = to_u32(bytes.len(), self.layout.name, "size")?;
        bytes[..SIZE_PREFIX].copy_from_slice(&size.to_le_bytes());
        trace!(table = self.layout.name, size, "Table encoded");

        Ok(EncodedTable { bytes, offsets })
    }
}

/// Encode a nested row with the given fields.
fn encode_row(
    name: &'static str,
    fields: &'static [Field],
    row: &[Value],
) -> Result<Vec<u8>, CodecError> {
    let mut writer = TableWriter::new(Layout::table(name, fields));
    for (slot, value) in row.iter().enumerate() {
        writer.set(slot, value.clone())?;
    }
    Ok(writer.finish()?.bytes)
}

fn write_value(
    out: &mut Vec<u8>,
    table: &'static str,
    field: &Field,
    value: &Value,
) -> Result<(), CodecError> {
    match (field.kind, value) {
        (FieldKind::U8, Value::U8(v)) => out.push(*v),
        (FieldKind::U16, Value::U16(v)) => out.extend_from_slice(&v.to_le_bytes()),
        (FieldKind::U32, Value::U32(v)) => out.extend_from_slice(&v.to_le_bytes()),
        (FieldKind::U64, Value::U64(v)) => {
            out.extend_from_slice(&(*v as u32).to_le_bytes());
            out.extend_from_slice(&((*v >> 32) as u32).to_le_bytes());
        }
        (FieldKind::Fixed(_), Value::Fixed(bytes)) => out.extend_from_slice(bytes),
        (FieldKind::Bytes, Value::Bytes(bytes)) => {
            write_count(out, bytes.len(), table, field.name)?;
            out.extend_from_slice(bytes);
        }
        (FieldKind::Array(_), Value::Array(items)) => {
            write_count(out, items.len(), table, field.name)?;
            for item in items {
                out.extend_from_slice(item);
            }
        }
        (FieldKind::Tables(fields), Value::Tables(rows)) => {
            write_count(out, rows.len(), table, field.name)?;
            for row in rows {
                out.extend_from_slice(&encode_row(field.name, fields, row)?);
            }
        }
        (FieldKind::Entities, Value::Entities(entities)) => {
            write_count(out, entities.len(), table, field.name)?;
            for entity in entities {
                out.extend_from_slice(entity);
            }
        }
        _ => {
            return Err(CodecError::KindMismatch {
                table,
                field: field.name,
                expected: field.kind.to_string(),
            })
        }
    }
    Ok(())
}

fn write_count(
    out: &mut Vec<u8>,
    count: usize,
    table: &'static str,
    field: &'static str,
) -> Result<(), CodecError> {
    out.extend_from_slice(&to_u32(count, table, field)?.to_le_bytes());
    Ok(())
}

fn to_u32(length: usize, table: &'static str, field: &'static str) -> Result<u32, CodecError> {
    u32::try_from(length).map_err(|_| CodecError::LengthOverflow {
        table,
        field,
        length,
    })
}
