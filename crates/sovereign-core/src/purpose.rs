//! Key purposes and purpose sets
//!
//! A purpose is a single capability bit. A key carries a set of purposes,
//! stored as a bitmask where every set bit is an independent capability.
//! Raw integers only become a [`Purpose`] through [`Purpose::new`], which
//! rejects anything that is not a nonzero power of two. Sets keep bits
//! without a name so that custom purposes survive a round trip.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IdentityError, Result};

/// A single capability bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Purpose(u64);

impl Purpose {
    /// May manage the key ring and thresholds
    pub const MANAGEMENT: Purpose = Purpose(Purposes::MANAGEMENT.bits());
    /// May authorize calls to other accounts
    pub const ACTION: Purpose = Purpose(Purposes::ACTION.bits());
    /// May sign claims about other identities
    pub const CLAIM: Purpose = Purpose(Purposes::CLAIM.bits());
    /// May encrypt data sent to this identity
    pub const ENCRYPTION: Purpose = Purpose(Purposes::ENCRYPTION.bits());

    /// Validate a raw purpose value
    pub fn new(value: u64) -> Result<Self> {
        if value.is_power_of_two() {
            Ok(Self(value))
        } else {
            Err(IdentityError::InvalidPurpose(value))
        }
    }

    pub fn bit(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for Purpose {
    type Error = IdentityError;

    fn try_from(value: u64) -> Result<Self> {
        Purpose::new(value)
    }
}

impl From<Purpose> for u64 {
    fn from(purpose: Purpose) -> u64 {
        purpose.0
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Purpose::MANAGEMENT => write!(f, "MANAGEMENT"),
            Purpose::ACTION => write!(f, "ACTION"),
            Purpose::CLAIM => write!(f, "CLAIM"),
            Purpose::ENCRYPTION => write!(f, "ENCRYPTION"),
            Purpose(bit) => write!(f, "purpose {}", bit),
        }
    }
}

bitflags::bitflags! {
    /// Set of purposes held by a key
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Purposes: u64 {
        const MANAGEMENT = 1;
        const ACTION = 1 << 1;
        const CLAIM = 1 << 2;
        const ENCRYPTION = 1 << 3;
        const _ = !0;
    }
}

impl Purposes {
    /// Purposes of the bootstrap key
    pub const BOOTSTRAP: Purposes = Purposes::MANAGEMENT.union(Purposes::ACTION);

    pub fn has(&self, purpose: Purpose) -> bool {
        self.contains(Purposes::from(purpose))
    }
}

impl Default for Purposes {
    fn default() -> Self {
        Purposes::empty()
    }
}

impl From<Purpose> for Purposes {
    fn from(purpose: Purpose) -> Self {
        Purposes::from_bits_retain(purpose.bit())
    }
}

impl fmt::Display for Purposes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        bitflags::parser::to_writer(self, f)
    }
}
