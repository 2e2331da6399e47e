//! # Quantities
//!
//! 64-bit unsigned magnitudes (token amounts, storage sizes).
//!
//! Query payloads carry these as two 32-bit words, low word first
//! (`[lo, hi]`). The wire codec writes the same two words little-endian, so
//! both representations preserve the full `u64` range without precision loss.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Split a 64-bit quantity into `[low, high]` 32-bit words.
pub const fn split_words(value: u64) -> [u32; 2] {
    [value as u32, (value >> 32) as u32]
}

/// Rebuild a 64-bit quantity from `[low, high]` 32-bit words.
pub const fn join_words(words: [u32; 2]) -> u64 {
    (words[0] as u64) | ((words[1] as u64) << 32)
}

macro_rules! quantity {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u64);

        impl $name {
            /// The raw magnitude.
            pub const fn value(self) -> u64 {
                self.0
            }

            /// The `[low, high]` word pair.
            pub const fn words(self) -> [u32; 2] {
                split_words(self.0)
            }

            /// Build from a `[low, high]` word pair.
            pub const fn from_words(words: [u32; 2]) -> Self {
                Self(join_words(words))
            }

            /// Checked addition.
            pub fn checked_add(self, other: Self) -> Option<Self> {
                self.0.checked_add(other.0).map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.words().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                <[u32; 2]>::deserialize(deserializer).map(Self::from_words)
            }
        }
    };
}

quantity!(
    /// Token amount (fees, pledged capacity in storage units).
    Amount
);

quantity!(
    /// Storage size in megabytes.
    StorageSize
);
