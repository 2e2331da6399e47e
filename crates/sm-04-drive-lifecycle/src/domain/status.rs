//! # Drive Status
//!
//! | Status | Modifications | Verification | Closure |
//! |--------|---------------|--------------|---------|
//! | `Preparing` | no | no | no |
//! | `Active` | submit, resolve | start | request |
//! | `VerificationPending` | submit, resolve | end | no |
//! | `Closing` | resolve | no | finalize |
//! | `Closed` | no | no | no |

use serde::{Deserialize, Serialize};

/// Observed status of a drive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveStatus {
    /// Waiting for the required replicators to join.
    #[default]
    Preparing,
    Active,
    /// A verification round is running.
    VerificationPending,
    /// Closure requested; pending modifications may still resolve.
    Closing,
    /// Terminal.
    Closed,
}

impl DriveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preparing => "Preparing",
            Self::Active => "Active",
            Self::VerificationPending => "VerificationPending",
            Self::Closing => "Closing",
            Self::Closed => "Closed",
        }
    }

    /// New data modifications may be submitted.
    pub fn accepts_modifications(self) -> bool {
        matches!(self, Self::Active | Self::VerificationPending)
    }

    /// Pending data modifications may be approved or cancelled.
    pub fn resolves_modifications(self) -> bool {
        matches!(self, Self::Active | Self::VerificationPending | Self::Closing)
    }

    pub fn is_closed(self) -> bool {
        self == Self::Closed
    }
}

/// Verification flags carried by the drive record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationStatus {
    /// A round is in progress.
    pub active: bool,
    /// The drive can accept a new round.
    pub available: bool,
}

impl VerificationStatus {
    pub const IDLE: Self = Self {
        active: false,
        available: true,
    };

    pub const RUNNING: Self = Self {
        active: true,
        available: false,
    };

    pub const UNAVAILABLE: Self = Self {
        active: false,
        available: false,
    };
}

impl Default for VerificationStatus {
    fn default() -> Self {
        Self::IDLE
    }
}
