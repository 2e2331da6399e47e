//! Codec error types.

use thiserror::Error;

/// Errors raised while writing or reading tables.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The buffer ends inside a field or a size prefix is out of range.
    #[error(
        "Malformed buffer: {table}.{field} at offset {offset} needs {needed} bytes, {available} available"
    )]
    MalformedBuffer {
        table: &'static str,
        field: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A declared size disagrees with the bytes supplied.
    #[error("Size mismatch: {table} declares {declared} bytes, buffer holds {actual}")]
    SizeMismatch {
        table: &'static str,
        declared: usize,
        actual: usize,
    },

    /// Unexpected type or version tag, or a layout that does not fit.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A value of the wrong kind or width was supplied or requested.
    #[error("Kind mismatch: {table}.{field} expects {expected}")]
    KindMismatch {
        table: &'static str,
        field: &'static str,
        expected: String,
    },

    /// Slot index beyond the layout.
    #[error("Unknown field slot: {table}[{slot}]")]
    UnknownSlot { table: &'static str, slot: usize },

    /// A length does not fit the `u32` count or size prefix.
    #[error("Length overflow: {table}.{field} has length {length}")]
    LengthOverflow {
        table: &'static str,
        field: &'static str,
        length: usize,
    },
}
