//! Field values.

use crate::domain::errors::CodecError;
use crate::domain::schema::{Field, FieldKind, SIZE_PREFIX};

/// A single field value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Fixed(Vec<u8>),
    Bytes(Vec<u8>),
    Array(Vec<Vec<u8>>),
    /// Nested tables, each as its values in field order.
    Tables(Vec<Vec<Value>>),
    /// Raw size-prefixed entities.
    Entities(Vec<Vec<u8>>),
}

impl Value {
    /// The value an absent field decodes to.
    pub fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::U8 => Self::U8(0),
            FieldKind::U16 => Self::U16(0),
            FieldKind::U32 => Self::U32(0),
            FieldKind::U64 => Self::U64(0),
            FieldKind::Fixed(n) => Self::Fixed(vec![0u8; n]),
            FieldKind::Bytes => Self::Bytes(Vec::new()),
            FieldKind::Array(_) => Self::Array(Vec::new()),
            FieldKind::Tables(_) => Self::Tables(Vec::new()),
            FieldKind::Entities => Self::Entities(Vec::new()),
        }
    }

    /// Check the value against its field descriptor.
    pub(crate) fn check(&self, table: &'static str, field: &Field) -> Result<(), CodecError> {
        let mismatch = || CodecError::KindMismatch {
            table,
            field: field.name,
            expected: field.kind.to_string(),
        };

        match (field.kind, self) {
            (FieldKind::U8, Self::U8(_))
            | (FieldKind::U16, Self::U16(_))
            | (FieldKind::U32, Self::U32(_))
            | (FieldKind::U64, Self::U64(_))
            | (FieldKind::Bytes, Self::Bytes(_)) => Ok(()),
            (FieldKind::Fixed(n), Self::Fixed(bytes)) if bytes.len() == n => Ok(()),
            (FieldKind::Array(width), Self::Array(items)) => {
                if items.iter().all(|item| item.len() == width) {
                    Ok(())
                } else {
                    Err(mismatch())
                }
            }
            (FieldKind::Tables(fields), Self::Tables(rows)) => {
                for row in rows {
                    if row.len() != fields.len() {
                        return Err(mismatch());
                    }
                    for (nested, value) in fields.iter().zip(row) {
                        value.check(field.name, nested)?;
                    }
                }
                Ok(())
            }
            (FieldKind::Entities, Self::Entities(entities)) => {
                for entity in entities {
                    check_entity(table, field.name, entity)?;
                }
                Ok(())
            }
            _ => Err(mismatch()),
        }
    }
}

/// A raw entity must carry a size prefix equal to its length.
fn check_entity(table: &'static str, field: &'static str, entity: &[u8]) -> Result<(), CodecError> {
    let Some(prefix) = entity.get(..SIZE_PREFIX) else {
        return Err(CodecError::MalformedBuffer {
            table,
            field,
            offset: 0,
            needed: SIZE_PREFIX,
            available: entity.len(),
        });
    };
    let declared = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
    if declared != entity.len() {
        return Err(CodecError::SizeMismatch {
            table,
            declared,
            actual: entity.len(),
        });
    }
    Ok(())
}

macro_rules! accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        pub fn $name(&self) -> Option<$ty> {
            match self {
                Self::$variant(v) => Some(*v),
                _ => None,
            }
        }
    };
}

impl Value {
    accessor!(as_u8, U8, u8);
    accessor!(as_u16, U16, u16);
    accessor!(as_u32, U32, u32);
    accessor!(as_u64, U64, u64);

    pub fn as_fixed(&self) -> Option<&[u8]> {
        match self {
            Self::Fixed(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Vec<u8>]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tables(&self) -> Option<&[Vec<Value>]> {
        match self {
            Self::Tables(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_entities(&self) -> Option<&[Vec<u8>]> {
        match self {
            Self::Entities(v) => Some(v),
            _ => None,
        }
    }
}
