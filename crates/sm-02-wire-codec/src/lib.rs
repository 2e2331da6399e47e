//! # Wire Codec Subsystem (SM-02)
//!
//! Generic size-prefixed table codec. Each transaction type describes its
//! table once as a static field list; the same descriptor drives both the
//! writer and the reader.
//!
//! ## Table Format
//!
//! ```text
//! ┌──────────┬─────────┬─────────┬─────┬─────────┐
//! │ size:u32 │ field 0 │ field 1 │ ... │ field n │
//! └──────────┴─────────┴─────────┴─────┴─────────┘
//! ```
//!
//! All integers are little-endian. `size` counts the whole table including
//! itself.
//!
//! | Kind | Encoding |
//! |------|----------|
//! | `U8`/`U16`/`U32` | fixed-width integer |
//! | `U64` | two `u32` words, low word first |
//! | `Fixed(n)` | `n` raw bytes |
//! | `Bytes` | `count:u32` + `count` bytes |
//! | `Array(w)` | `count:u32` + `count × w` bytes |
//! | `Tables(fields)` | `count:u32` + `count` size-prefixed nested tables |
//! | `Entities` | `count:u32` + `count` size-prefixed raw entities |
//!
//! ## Schema Evolution
//!
//! - A table that ends on a field boundary decodes the missing trailing
//!   fields as defaults and reports them absent.
//! - Bytes after the last field a reader knows about are skipped.
//! - A field cut mid-way is `MalformedBuffer`. The reader never indexes past
//!   the slice it was given.

pub mod domain;

// Re-export public API
pub use domain::errors::CodecError;
pub use domain::reader::{read_table, DecodedTable, FieldAccess, RowView};
pub use domain::schema::{Field, FieldKind, Layout, Slot, SIZE_PREFIX};
pub use domain::value::Value;
pub use domain::writer::{EncodedTable, TableWriter};
