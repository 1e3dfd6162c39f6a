//! Sovereign Core - Identity state machines without an execution environment
//!
//! This crate provides the data model of a self-sovereign identity: the key
//! ring with purpose bitmasks, per-purpose confirmation thresholds, the book of
//! pending multi-signature actions, the claim registry and the proxy metadata
//! store. Everything here is pure bookkeeping; dispatching calls and emitting
//! notifications happens in `sovereign-vm` and `sovereign-identity`.

pub mod actions;
pub mod claims;
pub mod error;
pub mod event;
pub mod hash;
pub mod keyring;
pub mod metadata;
pub mod purpose;
pub mod threshold;
pub mod types;

pub use actions::{ActionBook, ActionId, PendingAction};
pub use claims::{Claim, ClaimFiling, ClaimRegistry};
pub use error::{IdentityError, Result};
pub use event::Event;
pub use keyring::{Key, KeyRing};
pub use metadata::MetadataStore;
pub use purpose::{Purpose, Purposes};
pub use threshold::Thresholds;
pub use types::{Address, ClaimId, DataKey, KeyId, KeyType, Topic};

/// Claim scheme identifier for ECDSA proofs
pub const SCHEME_ECDSA: u64 = 1;
