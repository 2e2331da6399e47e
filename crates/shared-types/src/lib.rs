//! # Shared Types Crate
//!
//! Primitive types used across the storage market workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Keys, digests, quantities and wire tags are
//!   defined here and nowhere else.
//! - **Exact Magnitudes**: 64-bit quantities keep their full value through
//!   every representation, including the two-word `[lo, hi]` DTO form.
//! - **No Behaviour**: Nothing in this crate signs, hashes or encodes tables.

pub mod entities;
pub mod errors;
pub mod quantity;
pub mod wire;

pub use entities::*;
pub use errors::*;
pub use quantity::*;
pub use wire::*;
