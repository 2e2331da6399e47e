//! # Domain Layer - Table Codec
//!
//! - `schema`: Field descriptors, layouts and static offset tables
//! - `value`: Field values and their defaults
//! - `writer`: Any-order field writes, declared-order serialisation
//! - `reader`: Permissive, bounds-checked decoding
//! - `errors`: CodecError enumeration

pub mod errors;
pub mod reader;
pub mod schema;
pub mod value;
pub mod writer;
