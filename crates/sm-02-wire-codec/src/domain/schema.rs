//! # Table Schema
//!
//! A `Layout` is the ordered field list of one table kind. Transaction
//! layouts split it into a shared `prefix` (the common header) and a
//! type-specific `body`; slots number the prefix first, then the body.

use std::fmt;

/// Index of a field within a layout.
pub type Slot = usize;

/// Width of the table size prefix.
pub const SIZE_PREFIX: usize = 4;

/// Width of a `count` prefix on vectors.
pub(crate) const COUNT_PREFIX: usize = 4;

/// How a field is laid out on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    U16,
    U32,
    /// Two `u32` words, low word first.
    U64,
    /// Fixed-width byte string.
    Fixed(usize),
    /// `count:u32` followed by `count` bytes.
    Bytes,
    /// `count:u32` followed by `count` elements of the given width.
    Array(usize),
    /// `count:u32` followed by `count` nested tables of the given fields.
    Tables(&'static [Field]),
    /// `count:u32` followed by `count` size-prefixed raw entities.
    Entities,
}

impl FieldKind {
    /// Encoded width when it does not depend on the value.
    pub const fn fixed_width(&self) -> Option<usize> {
        match self {
            Self::U8 => Some(1),
            Self::U16 => Some(2),
            Self::U32 => Some(4),
            Self::U64 => Some(8),
            Self::Fixed(n) => Some(*n),
            Self::Bytes | Self::Array(_) | Self::Tables(_) | Self::Entities => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8 => f.write_str("u8"),
            Self::U16 => f.write_str("u16"),
            Self::U32 => f.write_str("u32"),
            Self::U64 => f.write_str("u64"),
            Self::Fixed(n) => write!(f, "fixed[{n}]"),
            Self::Bytes => f.write_str("bytes"),
            Self::Array(w) => write!(f, "array[{w}]"),
            Self::Tables(fields) => write!(f, "tables({} fields)", fields.len()),
            Self::Entities => f.write_str("entities"),
        }
    }
}

/// A named field descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl Field {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Ordered field list of one table kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub name: &'static str,
    pub prefix: &'static [Field],
    pub body: &'static [Field],
}

impl Layout {
    /// A layout with a shared prefix and a type-specific body.
    pub const fn new(name: &'static str, prefix: &'static [Field], body: &'static [Field]) -> Self {
        Self { name, prefix, body }
    }

    /// A plain table with no prefix (nested tables, cosignatures).
    pub const fn table(name: &'static str, fields: &'static [Field]) -> Self {
        Self {
            name,
            prefix: &[],
            body: fields,
        }
    }

    pub fn field_count(&self) -> usize {
        self.prefix.len() + self.body.len()
    }

    pub fn field(&self, slot: Slot) -> Option<&'static Field> {
        if slot < self.prefix.len() {
            self.prefix.get(slot)
        } else {
            self.body.get(slot - self.prefix.len())
        }
    }

    /// Fields in declared order.
    pub fn fields(&self) -> impl Iterator<Item = &'static Field> {
        self.prefix.iter().chain(self.body.iter())
    }

    /// Slot of the field called `name`.
    pub fn slot_of(&self, name: &str) -> Option<Slot> {
        self.fields().position(|f| f.name == name)
    }

    /// Slot of the first body field.
    pub fn body_start(&self) -> Slot {
        self.prefix.len()
    }

    /// Byte offset of `slot` when every field before it is fixed-width.
    pub fn fixed_offset(&self, slot: Slot) -> Option<usize> {
        if slot >= self.field_count() {
            return None;
        }
        let mut offset = SIZE_PREFIX;
        for field in self.fields().take(slot) {
            offset += field.kind.fixed_width()?;
        }
        Some(offset)
    }

    /// Static offsets of every field (`None` once a variable field precedes it).
    pub fn offset_table(&self) -> Vec<Option<usize>> {
        (0..self.field_count()).map(|slot| self.fixed_offset(slot)).collect()
    }

    /// Smallest possible encoding: every field at its default.
    pub fn min_size(&self) -> usize {
        SIZE_PREFIX
            + self
                .fields()
                .map(|f| f.kind.fixed_width().unwrap_or(COUNT_PREFIX))
                .sum::<usize>()
    }
}
