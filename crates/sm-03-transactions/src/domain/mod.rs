//! # Domain Layer - Transactions
//!
//! - `header`: Common header, top-level and embedded transactions
//! - `body`: One payload struct per transaction type
//! - `layouts`: Static field lists per type
//! - `codec`: `encode`/`decode` over the table codec
//! - `signing`: Signing payload, signature and hash
//! - `errors`: TransactionError enumeration

pub mod body;
pub mod codec;
pub mod errors;
pub mod header;
pub mod layouts;
pub mod signing;
