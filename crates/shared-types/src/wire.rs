//! # Wire Tags
//!
//! Network identifiers, entity type tags and deadlines carried in every
//! transaction header.
//!
//! The header `version` field packs the network type into the top byte and
//! the entity version into the low 24 bits:
//!
//! ```text
//! version:u32 = network_type << 24 | entity_version
//! ```

use crate::errors::TypesError;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Network the transaction is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NetworkType {
    MainNet = 0xb8,
    TestNet = 0xa8,
    Private = 0xc8,
    PrivateTest = 0xb0,
    Mijin = 0x60,
    MijinTest = 0x90,
}

impl NetworkType {
    /// The raw network byte.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for NetworkType {
    type Error = TypesError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0xb8 => Ok(Self::MainNet),
            0xa8 => Ok(Self::TestNet),
            0xc8 => Ok(Self::Private),
            0xb0 => Ok(Self::PrivateTest),
            0x60 => Ok(Self::Mijin),
            0x90 => Ok(Self::MijinTest),
            other => Err(TypesError::UnknownNetworkType(other)),
        }
    }
}

/// Numeric transaction type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u16)]
pub enum EntityType {
    AggregateComplete = 0x4141,
    AggregateBonded = 0x4241,
    PrepareBcDrive = 0x4162,
    DataModification = 0x4262,
    DataModificationCancel = 0x4562,
    ReplicatorOnboarding = 0x4662,
    DriveClosure = 0x4E62,
    EndDriveVerificationV2 = 0x4F62,
    Deploy = 0x415E,
    StartExecute = 0x425E,
}

impl EntityType {
    /// Every known tag, in declaration order.
    pub const ALL: [EntityType; 10] = [
        Self::AggregateComplete,
        Self::AggregateBonded,
        Self::PrepareBcDrive,
        Self::DataModification,
        Self::DataModificationCancel,
        Self::ReplicatorOnboarding,
        Self::DriveClosure,
        Self::EndDriveVerificationV2,
        Self::Deploy,
        Self::StartExecute,
    ];

    /// The raw tag.
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// The entity version this workspace reads and writes.
    pub const fn current_version(self) -> u8 {
        match self {
            Self::AggregateComplete | Self::AggregateBonded => 3,
            _ => 1,
        }
    }

    /// True for the two aggregate envelopes.
    pub const fn is_aggregate(self) -> bool {
        matches!(self, Self::AggregateComplete | Self::AggregateBonded)
    }

    /// Look up a raw tag.
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_u16() == value)
    }
}

/// Pack network type and entity version into the header `version` word.
pub const fn pack_version(network: NetworkType, version: u8) -> u32 {
    ((network as u32) << 24) | version as u32
}

/// Split a header `version` word into `(network byte, entity version)`.
pub const fn unpack_version(word: u32) -> (u8, u32) {
    ((word >> 24) as u8, word & 0x00FF_FFFF)
}

/// Network epoch: 2016-04-01T00:00:00Z, in milliseconds since the Unix epoch.
pub const NETWORK_EPOCH_MS: u64 = 1_459_468_800_000;

/// Transaction deadline, in milliseconds since the network epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Deadline(pub u64);

impl Deadline {
    /// Deadline `window` from now.
    pub fn from_now(window: Duration) -> Self {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(NETWORK_EPOCH_MS);
        let window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        Self::from_unix_ms(now_ms.saturating_add(window_ms))
    }

    /// Convert a Unix timestamp in milliseconds.
    pub const fn from_unix_ms(unix_ms: u64) -> Self {
        Self(unix_ms.saturating_sub(NETWORK_EPOCH_MS))
    }

    /// Milliseconds since the network epoch.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Milliseconds since the Unix epoch.
    pub const fn to_unix_ms(self) -> u64 {
        self.0.saturating_add(NETWORK_EPOCH_MS)
    }
}
