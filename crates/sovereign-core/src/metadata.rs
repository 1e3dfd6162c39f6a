//! Proxy metadata store
//!
//! Generic key-value storage with one reserved entry, [`DataKey::OWNER`],
//! holding the 20 bytes of the current owner address.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{IdentityError, Result};
use crate::types::{Address, DataKey};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataStore {
    entries: HashMap<DataKey, Vec<u8>>,
}

impl MetadataStore {
    pub fn new(owner: Address) -> Self {
        let mut entries = HashMap::new();
        entries.insert(DataKey::OWNER, owner.as_bytes().to_vec());
        Self { entries }
    }

    /// Current owner, decoded from the reserved entry
    pub fn owner(&self) -> Address {
        self.entries
            .get(&DataKey::OWNER)
            .and_then(|bytes| <[u8; 20]>::try_from(bytes.as_slice()).ok())
            .map(Address::new)
            .unwrap_or(Address::ZERO)
    }

    pub fn set_owner(&mut self, owner: Address) {
        self.entries
            .insert(DataKey::OWNER, owner.as_bytes().to_vec());
    }

    /// Write an entry; the owner entry is refused
    pub fn set(&mut self, key: DataKey, value: Vec<u8>) -> Result<()> {
        if key == DataKey::OWNER {
            return Err(IdentityError::ReservedDataKey);
        }
        self.entries.insert(key, value);
        Ok(())
    }

    /// Read an entry, empty when unset
    pub fn get(&self, key: &DataKey) -> Vec<u8> {
        self.entries.get(key).cloned().unwrap_or_default()
    }
}
