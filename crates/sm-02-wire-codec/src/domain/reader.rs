//! # Table Reader
//!
//! Decodes a size-prefixed table against a layout.
//!
//! ## Read Policy
//!
//! | Situation | Result |
//! |-----------|--------|
//! | Table ends exactly before a field | Field and all later fields default, reported absent |
//! | Table ends inside a field | `MalformedBuffer` |
//! | Size prefix < 4 or > slice length | `MalformedBuffer` |
//! | Bytes after the last known field | Ignored |
//!
//! Every read goes through `Cursor::take`, which checks bounds against the
//! table slice before indexing.

use crate::domain::errors::CodecError;
use crate::domain::schema::{Field, FieldKind, Layout, Slot, SIZE_PREFIX};
use crate::domain::value::Value;
use tracing::debug;

/// A decoded table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedTable {
    layout: Layout,
    values: Vec<Value>,
    present: Vec<bool>,
    offsets: Vec<Option<usize>>,
    size: usize,
}

impl DecodedTable {
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Declared size of the table, including its prefix.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn value(&self, slot: Slot) -> Option<&Value> {
        self.values.get(slot)
    }

    /// `false` when the field was defaulted because the table ended first.
    pub fn is_present(&self, slot: Slot) -> bool {
        self.present.get(slot).copied().unwrap_or(false)
    }

    /// Offset at which the field was read, if present.
    pub fn offset(&self, slot: Slot) -> Option<usize> {
        self.offsets.get(slot).copied().flatten()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// Decode one table from the start of `buf`.
pub fn read_table(layout: Layout, buf: &[u8]) -> Result<DecodedTable, CodecError> {
    decode(layout, buf).inspect_err(|error| {
        debug!(table = layout.name, %error, "Table decode failed");
    })
}

fn decode(layout: Layout, buf: &[u8]) -> Result<DecodedTable, CodecError> {
    let size = read_size(layout.name, "size", buf)?;
    let mut cursor = Cursor {
        table: layout.name,
        buf: &buf[..size],
        pos: SIZE_PREFIX,
    };

    let count = layout.field_count();
    let mut values = Vec::with_capacity(count);
    let mut present = Vec::with_capacity(count);
    let mut offsets = Vec::with_capacity(count);

    for field in layout.fields() {
        if cursor.at_end() {
            values.push(Value::default_for(field.kind));
            present.push(false);
            offsets.push(None);
            continue;
        }
        offsets.push(Some(cursor.pos));
        values.push(read_value(&mut cursor, field)?);
        present.push(true);
    }

    Ok(DecodedTable {
        layout,
        values,
        present,
        offsets,
        size,
    })
}

/// Validate a size prefix at the start of `buf` and return it.
fn read_size(table: &'static str, field: &'static str, buf: &[u8]) -> Result<usize, CodecError> {
    let Some(prefix) = buf.get(..SIZE_PREFIX) else {
        return Err(CodecError::MalformedBuffer {
            table,
            field,
            offset: 0,
            needed: SIZE_PREFIX,
            available: buf.len(),
        });
    };
    let size = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
    if size < SIZE_PREFIX || size > buf.len() {
        return Err(CodecError::MalformedBuffer {
            table,
            field,
            offset: 0,
            needed: size.max(SIZE_PREFIX),
            available: buf.len(),
        });
    }
    Ok(size)
}

struct Cursor<'a> {
    table: &'static str,
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    fn malformed(&self, field: &'static str, needed: usize) -> CodecError {
        CodecError::MalformedBuffer {
            table: self.table,
            field,
            offset: self.pos,
            needed,
            available: self.remaining(),
        }
    }

    fn take(&mut self, field: &'static str, n: usize) -> Result<&'a [u8], CodecError> {
        if n > self.remaining() {
            return Err(self.malformed(field, n));
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], CodecError> {
        let bytes = self.take(field, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn u32(&mut self, field: &'static str) -> Result<u32, CodecError> {
        self.take_array::<4>(field).map(u32::from_le_bytes)
    }

    /// Read a `count` prefix and check that `count` elements of at least
    /// `min_width` bytes could fit before allocating for them.
    fn count(&mut self, field: &'static str, min_width: usize) -> Result<usize, CodecError> {
        let count = self.u32(field)? as usize;
        let needed = count.saturating_mul(min_width);
        if needed > self.remaining() {
            return Err(self.malformed(field, needed));
        }
        Ok(count)
    }
}

fn read_value(cursor: &mut Cursor<'_>, field: &Field) -> Result<Value, CodecError> {
    let name = field.name;
    let value = match field.kind {
        FieldKind::U8 => Value::U8(cursor.take_array::<1>(name)?[0]),
        FieldKind::U16 => Value::U16(u16::from_le_bytes(cursor.take_array(name)?)),
        FieldKind::U32 => Value::U32(cursor.u32(name)?),
        FieldKind::U64 => {
            let low = cursor.u32(name)? as u64;
            let high = cursor.u32(name)? as u64;
            Value::U64(low | (high << 32))
        }
        FieldKind::Fixed(n) => Value::Fixed(cursor.take(name, n)?.to_vec()),
        FieldKind::Bytes => {
            let count = cursor.count(name, 1)?;
            Value::Bytes(cursor.take(name, count)?.to_vec())
        }
        FieldKind::Array(0) => {
            return Err(CodecError::SchemaMismatch(format!(
                "{}.{name} declares zero-width elements",
                cursor.table
            )))
        }
        FieldKind::Array(width) => {
            let count = cursor.count(name, width)?;
            let bytes = cursor.take(name, count * width)?;
            Value::Array(bytes.chunks_exact(width).map(<[u8]>::to_vec).collect())
        }
        FieldKind::Tables(fields) => {
            let count = cursor.count(name, SIZE_PREFIX)?;
            let nested_layout = Layout::table(name, fields);
            let mut rows = Vec::with_capacity(count);
            for _ in 0..count {
                let start = cursor.pos;
                let nested = decode(nested_layout, &cursor.buf[start..])?;
                cursor.pos = start + nested.size;
                rows.push(nested.into_values());
            }
            Value::Tables(rows)
        }
        FieldKind::Entities => {
            let count = cursor.count(name, SIZE_PREFIX)?;
            let mut entities = Vec::with_capacity(count);
            for _ in 0..count {
                let size = read_size(cursor.table, name, &cursor.buf[cursor.pos..])?;
                entities.push(cursor.take(name, size)?.to_vec());
            }
            Value::Entities(entities)
        }
    };
    debug_assert!(cursor.pos <= cursor.buf.len());
    Ok(value)
}

// =============================================================================
// TYPED ACCESS
// =============================================================================

/// Typed getters shared by decoded tables and nested rows.
pub trait FieldAccess {
    /// Name used in error messages.
    fn table_name(&self) -> &'static str;

    /// Descriptor and value at `slot`.
    fn field_at(&self, slot: Slot) -> Option<(&'static Field, &Value)>;

    fn get(&self, slot: Slot) -> Result<(&'static Field, &Value), CodecError> {
        self.field_at(slot).ok_or(CodecError::UnknownSlot {
            table: self.table_name(),
            slot,
        })
    }

    fn get_u8(&self, slot: Slot) -> Result<u8, CodecError> {
        let (field, value) = self.get(slot)?;
        value.as_u8().ok_or_else(|| kind_mismatch(self.table_name(), field))
    }

    fn get_u16(&self, slot: Slot) -> Result<u16, CodecError> {
        let (field, value) = self.get(slot)?;
        value.as_u16().ok_or_else(|| kind_mismatch(self.table_name(), field))
    }

    fn get_u32(&self, slot: Slot) -> Result<u32, CodecError> {
        let (field, value) = self.get(slot)?;
        value.as_u32().ok_or_else(|| kind_mismatch(self.table_name(), field))
    }

    fn get_u64(&self, slot: Slot) -> Result<u64, CodecError> {
        let (field, value) = self.get(slot)?;
        value.as_u64().ok_or_else(|| kind_mismatch(self.table_name(), field))
    }

    fn get_fixed<const N: usize>(&self, slot: Slot) -> Result<[u8; N], CodecError> {
        let (field, value) = self.get(slot)?;
        value
            .as_fixed()
            .and_then(|bytes| <[u8; N]>::try_from(bytes).ok())
            .ok_or_else(|| kind_mismatch(self.table_name(), field))
    }

    fn get_bytes(&self, slot: Slot) -> Result<&[u8], CodecError> {
        let (field, value) = self.get(slot)?;
        value
            .as_bytes()
            .ok_or_else(|| kind_mismatch(self.table_name(), field))
    }

    fn get_array(&self, slot: Slot) -> Result<&[Vec<u8>], CodecError> {
        let (field, value) = self.get(slot)?;
        value
            .as_array()
            .ok_or_else(|| kind_mismatch(self.table_name(), field))
    }

    fn get_entities(&self, slot: Slot) -> Result<&[Vec<u8>], CodecError> {
        let (field, value) = self.get(slot)?;
        value
            .as_entities()
            .ok_or_else(|| kind_mismatch(self.table_name(), field))
    }

    /// Nested rows of a `Tables` field.
    fn get_rows(&self, slot: Slot) -> Result<Vec<RowView<'_>>, CodecError> {
        let (field, value) = self.get(slot)?;
        let (FieldKind::Tables(fields), Some(rows)) = (field.kind, value.as_tables()) else {
            return Err(kind_mismatch(self.table_name(), field));
        };
        Ok(rows
            .iter()
            .map(|values| RowView {
                name: field.name,
                fields,
                values,
            })
            .collect())
    }
}

fn kind_mismatch(table: &'static str, field: &Field) -> CodecError {
    CodecError::KindMismatch {
        table,
        field: field.name,
        expected: field.kind.to_string(),
    }
}

impl FieldAccess for DecodedTable {
    fn table_name(&self) -> &'static str {
        self.layout.name
    }

    fn field_at(&self, slot: Slot) -> Option<(&'static Field, &Value)> {
        Some((self.layout.field(slot)?, self.values.get(slot)?))
    }
}

/// A borrowed nested row.
#[derive(Clone, Copy, Debug)]
pub struct RowView<'a> {
    name: &'static str,
    fields: &'static [Field],
    values: &'a [Value],
}

impl FieldAccess for RowView<'_> {
    fn table_name(&self) -> &'static str {
        self.name
    }

    fn field_at(&self, slot: Slot) -> Option<(&'static Field, &Value)> {
        Some((self.fields.get(slot)?, self.values.get(slot)?))
    }
}
